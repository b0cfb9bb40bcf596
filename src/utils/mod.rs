pub mod db_utils;
pub mod record_loader;
