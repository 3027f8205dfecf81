// Test modules for ITPro
// Each module covers the public behaviour of the corresponding source module

mod storage_tests;
