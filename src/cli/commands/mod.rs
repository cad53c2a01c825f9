pub mod delete;
pub mod describe;
pub mod edit;
pub mod export;
pub mod gen;
pub mod get;
pub mod import_cmd;
pub mod info;
pub mod list;
pub mod location;
pub mod passwd;
pub mod set;
