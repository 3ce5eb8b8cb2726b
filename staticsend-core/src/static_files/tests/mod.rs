mod helpers;
mod send_tests;
