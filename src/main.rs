#[tokio::main]
async fn main() -> anyhow::Result<()> {
    gemini_chat_lib::run().await
}
