use tracing::info;

pub async fn healthcheck() -> &'static str {
    info!("Received /healthcheck request");
    "OK"
}
