use chat_webapi::{Config, Server};
use dotenv::dotenv;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    let server = Server::new(config);
    server.run().await
}
