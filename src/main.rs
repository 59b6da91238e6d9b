#[tokio::main]
async fn main() -> anyhow::Result<()> {
    podcast_shelf_lib::run().await
}
