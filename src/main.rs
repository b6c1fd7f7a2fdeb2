#[tokio::main]
async fn main() {
    metronest::run().await;
}
