pub mod infer;
pub mod info;
pub mod init_config;
pub mod validate;
