mod candidate_tests;
mod config_tests;
mod holder_tests;
mod report_tests;
