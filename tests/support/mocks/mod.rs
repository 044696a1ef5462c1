// tests/support/mocks/mod.rs
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod directory;
pub mod time;

pub use directory::{
    BROKEN_SUBJECT, GHOST_SUBJECT, StaticUserDirectory, USER_EMAIL, USER_EXTERNAL_ID, USER_ID,
    USER_NAME, sample_user,
};
pub use time::{RealClock, SteppingClock, fixed_now};
