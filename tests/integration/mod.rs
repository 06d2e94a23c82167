mod config_loading;
mod test_utils;
