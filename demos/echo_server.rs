//! A small server demonstrating the nanohttp-rs API.
//!
//! Run with `cargo run --example echo_server [port]` and try
//! `curl 'http://127.0.0.1:2000/test?test=hello'`.

use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info};
use nanohttp_rs::server::HandlerFuture;
use nanohttp_rs::{Handler, HttpServer, Request, ServerConfig, StatusCode};

/// Echoes one query parameter back as the response body.
struct QueryEchoHandler {
    param: &'static str,
}

impl Handler for QueryEchoHandler {
    fn handle(&self, mut request: Request) -> HandlerFuture {
        let param = self.param;
        Box::pin(async move {
            let body = request.query_params().remove(param).unwrap_or_default();
            request.add_response_header("Access-Allow-Content-Origin", "*");
            request.send_response(body, StatusCode::Ok.into()).await
        })
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let port: u16 = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 2000,
    };
    let config = ServerConfig::default().with_addr(SocketAddr::from(([127, 0, 0, 1], port)));

    let mut server = HttpServer::bind(config).await?;

    // 1. The query echo handler
    server.add_handler("/test", QueryEchoHandler { param: "test" });

    // 2. Echo the parsed request head as JSON
    server.add_route("/headers", |mut req| async move {
        let head = req.head().clone();
        req.send_json(&head, StatusCode::Ok.into()).await
    });

    let server = Arc::new(server);

    // Stop accepting on Ctrl+C
    let stopper = server.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Received Ctrl+C, initiating graceful shutdown");
                stopper.stop();
            }
            Err(e) => error!("Error setting up Ctrl+C handler: {e}"),
        }
    });

    server.start().await?;

    Ok(())
}
