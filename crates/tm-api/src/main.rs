#[tokio::main]
async fn main() {
    if let Err(err) = tm_api::run().await {
        tracing::error!(error = %err, "tm-api failed");
        std::process::exit(1);
    }
}
