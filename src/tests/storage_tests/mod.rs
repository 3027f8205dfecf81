// Storage Tests Module - Testing the storage module
// Tests organized by storage module functionality:
// - message_tests: Message decoding, timestamp parsing, conversation summaries
// - session_tests: Session cache (store, update, clear, persistence)
// - settings_tests: Settings defaults and load/save

mod message_tests;
mod session_tests;
mod settings_tests;
