use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    pawsense::run().await
}
