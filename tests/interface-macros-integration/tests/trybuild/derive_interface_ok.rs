use hexwire_common::Interface;
use hexwire_macros::Interface;

#[derive(Debug, Interface)]
#[hexwire(port = "app.storage.blobs")]
pub struct BlobStore {
    pub bucket: String,
}

#[derive(Interface)]
#[hexwire(port = "app.modes", name = "RunMode", description = "运行模式")]
pub enum Mode {
    Fast,
    Safe,
}

fn main() {
    let info = BlobStore::info();
    assert_eq!(info.name, "BlobStore");
    assert_eq!(info.port().leaf(), "blobs");
    assert_eq!(info.snake_name(), "blob_store");

    assert_eq!(Mode::info().description, Some("运行模式"));
    let _ = (Mode::Fast, Mode::Safe);
}
