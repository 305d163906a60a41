#[tokio::main]
async fn main() -> anyhow::Result<()> {
    saheli_lib::run().await
}
