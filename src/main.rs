#[tokio::main]
async fn main() {
    if let Err(e) = stipendia::run().await {
        eprintln!("stipendia: {e}");
        std::process::exit(1);
    }
}
