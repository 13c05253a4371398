use clap::Parser;
use keyward::cli::{
    Args, Command, build_config, init_logging, issue_service_token, load_jwt_secret,
};
use keyward::run_server;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let args = Args::parse();

    init_logging(&args.log_format);

    let Some(jwt_secret) = load_jwt_secret(args.jwt_secret_file.as_deref()) else {
        std::process::exit(1);
    };

    match args.command {
        Command::IssueToken {
            id,
            roles,
            permissions,
        } => match issue_service_token(&jwt_secret, id, roles, permissions) {
            Ok(token) => println!("{}", token),
            Err(e) => {
                error!(error = %e, "Failed to issue token");
                std::process::exit(1);
            }
        },
        Command::Serve {
            port,
            secure_cookies,
        } => {
            let config = build_config(jwt_secret, secure_cookies);

            let addr = format!("0.0.0.0:{}", port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .unwrap_or_else(|e| {
                    error!(address = %addr, error = %e, "Failed to bind");
                    std::process::exit(1);
                });

            match listener.local_addr() {
                Ok(local_addr) => info!(address = %local_addr, "Listening"),
                Err(e) => info!(address = %addr, error = %e, "Listening"),
            }

            if let Err(e) = run_server(config, listener).await {
                error!(error = %e, "Server error");
                std::process::exit(1);
            }
        }
    }
}
