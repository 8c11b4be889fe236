//! Typed editing events.
//!
//! Events arrive on the wire as flat JSON objects discriminated by `type`.
//! They are converted once, at parse time, into a closed [`EventKind`] so that
//! consumers never branch on "is this field present". Unknown kinds and kinds
//! missing their required fields become [`EventKind::Unknown`] instead of
//! failing the whole document.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single recorded event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Map<String, Value>", into = "RawEvent")]
pub struct Event {
    /// Milliseconds from session start
    pub time: u64,
    /// Caret hint captured alongside the event
    pub pos: Option<i64>,
    pub kind: EventKind,
}

/// Closed set of event kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum EventKind {
    Key {
        phase: KeyPhase,
        key: String,
        code: String,
        modifiers: Modifiers,
    },
    Input {
        phase: InputPhase,
        input_type: String,
        /// Raw `data` field, kept for writing the event back out
        data: Option<String>,
        change: TextChange,
    },
    Composition {
        phase: CompositionPhase,
        data: Option<String>,
        segments: Vec<Value>,
    },
    Selection {
        anchor: SelectionPoint,
        focus: SelectionPoint,
    },
    Focus,
    Blur,
    Custom {
        label: String,
        payload: Value,
    },
    Unknown {
        kind: String,
        fields: Map<String, Value>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyPhase {
    Down,
    Up,
}

/// `beforeinput` vs `input`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPhase {
    Before,
    After,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositionPhase {
    Start,
    Update,
    End,
}

/// How an input event changes the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextChange {
    /// The full buffer content after the edit
    Snapshot(String),
    /// An incremental change relative to the event position
    Delta(Delta),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delta {
    Insert(String),
    DeleteBackward,
    DeleteForward,
    /// Cut or drag removal. The removed range is not recorded.
    CutOrDrag,
    Unsupported,
}

impl TextChange {
    /// Decide the change carried by an input event.
    ///
    /// A `text` snapshot always wins over the `data` delta.
    pub fn classify(input_type: &str, data: Option<&str>, text: Option<String>) -> Self {
        if let Some(text) = text {
            return TextChange::Snapshot(text);
        }

        let delta = match (input_type, data) {
            ("deleteContentBackward", _) => Delta::DeleteBackward,
            ("deleteContentForward", _) => Delta::DeleteForward,
            ("deleteByCut", _) | ("deleteByDrag", _) => Delta::CutOrDrag,
            ("insertLineBreak", None) | ("insertParagraph", None) => {
                Delta::Insert("\n".to_string())
            }
            (t, Some(data)) if t.starts_with("insert") => Delta::Insert(data.to_string()),
            _ => Delta::Unsupported,
        };
        TextChange::Delta(delta)
    }
}

/// Modifier keys held during a key event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    #[serde(default)]
    pub shift: bool,
    #[serde(default)]
    pub ctrl: bool,
    #[serde(default)]
    pub alt: bool,
    #[serde(default)]
    pub meta: bool,
}

impl Modifiers {
    /// Lenient read of a `mods` value.
    ///
    /// Accepts an object of booleans or an array of modifier names.
    /// Anything else yields no modifiers.
    pub fn from_value(value: &Value) -> Self {
        let mut mods = Modifiers::default();
        match value {
            Value::Object(map) => {
                let flag = |name: &str| map.get(name).and_then(Value::as_bool).unwrap_or(false);
                mods.shift = flag("shift");
                mods.ctrl = flag("ctrl");
                mods.alt = flag("alt");
                mods.meta = flag("meta");
            }
            Value::Array(names) => {
                for name in names.iter().filter_map(Value::as_str) {
                    match name.to_ascii_lowercase().as_str() {
                        "shift" => mods.shift = true,
                        "ctrl" | "control" => mods.ctrl = true,
                        "alt" | "option" => mods.alt = true,
                        "meta" | "cmd" | "command" => mods.meta = true,
                        _ => {}
                    }
                }
            }
            _ => {}
        }
        mods
    }

    pub fn is_empty(&self) -> bool {
        !(self.shift || self.ctrl || self.alt || self.meta)
    }
}

/// Selection directionality.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Affinity {
    Forward,
    Backward,
    #[default]
    None,
}

impl From<String> for Affinity {
    fn from(value: String) -> Self {
        match value.as_str() {
            "forward" => Affinity::Forward,
            "backward" => Affinity::Backward,
            _ => Affinity::None,
        }
    }
}

impl From<Affinity> for String {
    fn from(value: Affinity) -> Self {
        match value {
            Affinity::Forward => "forward",
            Affinity::Backward => "backward",
            Affinity::None => "none",
        }
        .to_string()
    }
}

/// One end of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionPoint {
    pub index: i64,
    #[serde(default)]
    pub affinity: Affinity,
}

impl SelectionPoint {
    pub fn new(index: i64) -> Self {
        Self {
            index,
            affinity: Affinity::None,
        }
    }
}

impl Event {
    pub fn new(time: u64, kind: EventKind) -> Self {
        Self {
            time,
            pos: None,
            kind,
        }
    }

    /// Attach a caret hint.
    pub fn with_pos(mut self, pos: i64) -> Self {
        self.pos = Some(pos);
        self
    }

    /// An `input` event carrying both the inserted `data` and the resulting `text`.
    pub fn snapshot(time: u64, data: Option<&str>, text: impl Into<String>) -> Self {
        Self::input(time, "insertText", data, Some(text.into()))
    }

    /// An `input` event carrying only an inserted string.
    pub fn insert_text(time: u64, data: impl Into<String>) -> Self {
        let data: String = data.into();
        Self::input(time, "insertText", Some(&data), None)
    }

    pub fn delete_backward(time: u64) -> Self {
        Self::input(time, "deleteContentBackward", None, None)
    }

    pub fn delete_forward(time: u64) -> Self {
        Self::input(time, "deleteContentForward", None, None)
    }

    /// A committed (`input` phase) input event.
    pub fn input(time: u64, input_type: &str, data: Option<&str>, text: Option<String>) -> Self {
        Self::new(
            time,
            EventKind::Input {
                phase: InputPhase::After,
                input_type: input_type.to_string(),
                data: data.map(str::to_string),
                change: TextChange::classify(input_type, data, text),
            },
        )
    }

    pub fn composition(time: u64, phase: CompositionPhase, data: Option<&str>) -> Self {
        Self::new(
            time,
            EventKind::Composition {
                phase,
                data: data.map(str::to_string),
                segments: Vec::new(),
            },
        )
    }

    pub fn selection(time: u64, anchor: i64, focus: i64) -> Self {
        Self::new(
            time,
            EventKind::Selection {
                anchor: SelectionPoint::new(anchor),
                focus: SelectionPoint::new(focus),
            },
        )
    }

    pub fn key(time: u64, phase: KeyPhase, key: &str) -> Self {
        Self::new(
            time,
            EventKind::Key {
                phase,
                key: key.to_string(),
                code: String::new(),
                modifiers: Modifiers::default(),
            },
        )
    }

    pub fn custom(time: u64, label: impl Into<String>) -> Self {
        Self::new(
            time,
            EventKind::Custom {
                label: label.into(),
                payload: Value::Null,
            },
        )
    }

    /// The wire `type` discriminator.
    pub fn kind_name(&self) -> &str {
        self.kind.name()
    }

    pub fn is_marker(&self) -> bool {
        matches!(self.kind, EventKind::Custom { .. })
    }
}

impl EventKind {
    pub fn name(&self) -> &str {
        match self {
            EventKind::Key { phase, .. } => match phase {
                KeyPhase::Down => "keydown",
                KeyPhase::Up => "keyup",
            },
            EventKind::Input { phase, .. } => match phase {
                InputPhase::Before => "beforeinput",
                InputPhase::After => "input",
            },
            EventKind::Composition { phase, .. } => match phase {
                CompositionPhase::Start => "compositionstart",
                CompositionPhase::Update => "compositionupdate",
                CompositionPhase::End => "compositionend",
            },
            EventKind::Selection { .. } => "selectionchange",
            EventKind::Focus => "focus",
            EventKind::Blur => "blur",
            EventKind::Custom { .. } => "custom",
            EventKind::Unknown { kind, .. } => kind,
        }
    }
}

/// Wire `type` values with a typed representation.
const KNOWN_KINDS: &[&str] = &[
    "keydown",
    "keyup",
    "beforeinput",
    "input",
    "compositionstart",
    "compositionupdate",
    "compositionend",
    "selectionchange",
    "focus",
    "blur",
    "custom",
];

/// Fields shared by every event on the wire.
#[derive(Deserialize)]
struct EventHeader {
    #[serde(rename = "type")]
    kind: String,
    time: u64,
}

impl TryFrom<Map<String, Value>> for Event {
    type Error = serde_json::Error;

    fn try_from(object: Map<String, Value>) -> Result<Self, Self::Error> {
        let header: EventHeader = serde_json::from_value(Value::Object(object.clone()))?;

        let mut event = if KNOWN_KINDS.contains(&header.kind.as_str()) {
            let raw: RawEvent = serde_json::from_value(Value::Object(object.clone()))?;
            Event::from(raw)
        } else {
            Event {
                time: header.time,
                pos: object.get("pos").and_then(Value::as_i64),
                kind: EventKind::Unknown {
                    kind: header.kind,
                    fields: Map::new(),
                },
            }
        };

        // Unknown and degraded events keep every other field verbatim
        if let EventKind::Unknown { fields, .. } = &mut event.kind {
            *fields = object;
            fields.remove("type");
            fields.remove("time");
            if event.pos.is_some() {
                fields.remove("pos");
            }
        }
        Ok(event)
    }
}

/// Flat wire shape of an event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawEvent {
    #[serde(rename = "type")]
    kind: String,
    time: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pos: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mods: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    input_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    segments: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    anchor: Option<SelectionPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    focus: Option<SelectionPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl From<RawEvent> for Event {
    fn from(raw: RawEvent) -> Self {
        let kind = match raw.kind.as_str() {
            "keydown" | "keyup" => EventKind::Key {
                phase: if raw.kind == "keydown" {
                    KeyPhase::Down
                } else {
                    KeyPhase::Up
                },
                key: raw.key.unwrap_or_default(),
                code: raw.code.unwrap_or_default(),
                modifiers: raw
                    .mods
                    .as_ref()
                    .map(Modifiers::from_value)
                    .unwrap_or_default(),
            },
            "beforeinput" | "input" => {
                let input_type = raw.input_type.unwrap_or_default();
                let change = TextChange::classify(&input_type, raw.data.as_deref(), raw.text);
                EventKind::Input {
                    phase: if raw.kind == "input" {
                        InputPhase::After
                    } else {
                        InputPhase::Before
                    },
                    input_type,
                    data: raw.data,
                    change,
                }
            }
            "compositionstart" | "compositionupdate" | "compositionend" => {
                EventKind::Composition {
                    phase: match raw.kind.as_str() {
                        "compositionstart" => CompositionPhase::Start,
                        "compositionupdate" => CompositionPhase::Update,
                        _ => CompositionPhase::End,
                    },
                    data: raw.data,
                    segments: raw.segments.unwrap_or_default(),
                }
            }
            "selectionchange" => match (raw.anchor, raw.focus) {
                (Some(anchor), Some(focus)) => EventKind::Selection { anchor, focus },
                _ => EventKind::Unknown {
                    kind: raw.kind,
                    fields: raw.extra,
                },
            },
            "focus" => EventKind::Focus,
            "blur" => EventKind::Blur,
            "custom" => EventKind::Custom {
                label: raw.label.unwrap_or_default(),
                payload: raw.payload.unwrap_or(Value::Null),
            },
            _ => EventKind::Unknown {
                kind: raw.kind,
                fields: raw.extra,
            },
        };

        Event {
            time: raw.time,
            pos: raw.pos,
            kind,
        }
    }
}

impl From<Event> for RawEvent {
    fn from(event: Event) -> Self {
        let mut raw = RawEvent {
            kind: event.kind_name().to_string(),
            time: event.time,
            pos: event.pos,
            ..RawEvent::default()
        };

        match event.kind {
            EventKind::Key {
                key,
                code,
                modifiers,
                ..
            } => {
                raw.key = Some(key);
                raw.code = Some(code);
                if !modifiers.is_empty() {
                    raw.mods = serde_json::to_value(modifiers).ok();
                }
            }
            EventKind::Input {
                input_type,
                data,
                change,
                ..
            } => {
                raw.input_type = Some(input_type);
                raw.data = data;
                if let TextChange::Snapshot(text) = change {
                    raw.text = Some(text);
                }
            }
            EventKind::Composition { data, segments, .. } => {
                raw.data = data;
                if !segments.is_empty() {
                    raw.segments = Some(segments);
                }
            }
            EventKind::Selection { anchor, focus } => {
                raw.anchor = Some(anchor);
                raw.focus = Some(focus);
            }
            EventKind::Focus | EventKind::Blur => {}
            EventKind::Custom { label, payload } => {
                raw.label = Some(label);
                if !payload.is_null() {
                    raw.payload = Some(payload);
                }
            }
            EventKind::Unknown { fields, .. } => {
                raw.extra = fields;
            }
        }

        raw
    }
}
