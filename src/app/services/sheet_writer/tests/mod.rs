pub mod writer_tests;
