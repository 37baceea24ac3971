pub mod fixtures;

#[cfg(test)]
mod auth_tests;
#[cfg(test)]
mod board_tests;
#[cfg(test)]
mod common_tests;
#[cfg(test)]
mod member_tests;
