// Purpose - external event formats and their translation into bank commands

pub mod converter;
pub mod midi;
