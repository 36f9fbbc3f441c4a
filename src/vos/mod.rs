pub mod report;
pub mod userdata;
