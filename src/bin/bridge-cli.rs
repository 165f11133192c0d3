use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use uuid::Uuid;

use rpcx_http_bridge::bridge::headers::{
    MESSAGE_STATUS_ERROR, X_ERROR_MESSAGE, X_MESSAGE_ID, X_MESSAGE_STATUS_TYPE, X_SERIALIZE_TYPE,
    X_SERVICE_METHOD, X_SERVICE_PATH,
};

#[derive(Parser)]
#[command(name = "bridge-cli")]
#[command(about = "Call rpcx services through the HTTP bridge", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:9981")]
    url: String,

    /// Bearer token sent in the Authorization header.
    #[arg(short, long, env = "RPCX_BRIDGE_TOKEN")]
    token: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Invoke a service method
    Call {
        /// Service path, e.g. Arith
        service_path: String,
        /// Method name, e.g. Mul
        method: String,
        /// Request payload
        #[arg(short, long, default_value = "")]
        data: String,
        /// Correlation ID; a random UUID when omitted
        #[arg(long)]
        message_id: Option<String>,
        /// rpcx serialize type (1 = JSON)
        #[arg(long, default_value_t = 1)]
        serialize_type: u16,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.token))?,
    );

    match cli.command {
        Commands::Call {
            service_path,
            method,
            data,
            message_id,
            serialize_type,
        } => {
            let message_id = message_id.unwrap_or_else(|| Uuid::new_v4().to_string());
            headers.insert(X_SERVICE_PATH, HeaderValue::from_str(&service_path)?);
            headers.insert(X_SERVICE_METHOD, HeaderValue::from_str(&method)?);
            headers.insert(X_MESSAGE_ID, HeaderValue::from_str(&message_id)?);
            headers.insert(X_SERIALIZE_TYPE, HeaderValue::from(serialize_type));
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/octet-stream"));

            let res = client
                .post(format!("{}/{}", cli.url.trim_end_matches('/'), service_path))
                .headers(headers)
                .body(data)
                .send()
                .await?;
            print_response(res).await
        }
    }
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: bridge returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    let failed = res
        .headers()
        .get(X_MESSAGE_STATUS_TYPE)
        .is_some_and(|v| v == MESSAGE_STATUS_ERROR);
    if failed {
        let message = res
            .headers()
            .get(X_ERROR_MESSAGE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        eprintln!("Error: {}", message);
        std::process::exit(1);
    }

    let body = res.bytes().await?;
    match serde_json::from_slice::<serde_json::Value>(&body) {
        Ok(json) => println!("{}", serde_json::to_string_pretty(&json)?),
        Err(_) => println!("{}", String::from_utf8_lossy(&body)),
    }
    Ok(())
}
