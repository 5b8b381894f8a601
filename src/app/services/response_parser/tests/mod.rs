pub mod fallback_tests;
pub mod normalize_tests;
