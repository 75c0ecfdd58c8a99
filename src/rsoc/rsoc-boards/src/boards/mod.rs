pub mod nereid;
pub mod ulx3s;
