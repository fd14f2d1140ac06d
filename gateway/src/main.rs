//! Gateway binary: REST + GraphQL on port 3000, fanning out to the user
//! and reunion gRPC services. Clients are constructed here and injected;
//! channels connect lazily on first request.

use reunio_gateway::{build_schema, graphql, rest, AppState};
use reunio_reunion_service::proto::reunion_service_client::ReunionServiceClient;
use reunio_user_service::proto::user_service_client::UserServiceClient;
use std::net::SocketAddr;
use tonic::transport::Channel;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    dotenvy::dotenv().ok();

    let user_endpoint = std::env::var("USER_GRPC_ENDPOINT")
        .unwrap_or_else(|_| "http://127.0.0.1:50051".into());
    let reunion_endpoint = std::env::var("REUNION_GRPC_ENDPOINT")
        .unwrap_or_else(|_| "http://127.0.0.1:50052".into());

    tracing::info!("connecting to user service at {user_endpoint}");
    tracing::info!("connecting to reunion service at {reunion_endpoint}");

    let users = UserServiceClient::new(Channel::from_shared(user_endpoint)?.connect_lazy());
    let reunions =
        ReunionServiceClient::new(Channel::from_shared(reunion_endpoint)?.connect_lazy());

    let schema = build_schema(users.clone(), reunions.clone());
    let state = AppState { users, reunions };

    let app = rest::router(state)
        .merge(graphql::routes(schema))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = std::env::var("GATEWAY_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:3000".into())
        .parse()?;

    tracing::info!("gateway listening on {addr}");
    tracing::info!("GraphiQL available at http://{addr}/graphql");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
