mod cli_test;
mod document_test;
mod helpers;
mod replay_test;
