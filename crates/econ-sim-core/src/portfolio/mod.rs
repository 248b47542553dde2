pub mod two_asset;
