//! Test harness: boots the real gRPC backends on ephemeral ports,
//! backed by in-memory storage, and returns connected clients.

use reunio_reunion_service::proto::reunion_service_client::ReunionServiceClient;
use reunio_reunion_service::proto::reunion_service_server::ReunionServiceServer;
use reunio_reunion_service::{MemoryReunionStorage, ReunionServiceGrpcService};
use reunio_user_service::proto::user_service_client::UserServiceClient;
use reunio_user_service::proto::user_service_server::UserServiceServer;
use reunio_user_service::{MemoryUserStorage, UserServiceGrpcService};
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::{Channel, Server};

pub async fn spawn_backends() -> (UserServiceClient<Channel>, ReunionServiceClient<Channel>) {
    let user_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let user_addr = user_listener.local_addr().unwrap();
    tokio::spawn(
        Server::builder()
            .add_service(UserServiceServer::new(UserServiceGrpcService::new(
                MemoryUserStorage::default(),
            )))
            .serve_with_incoming(TcpListenerStream::new(user_listener)),
    );

    let reunion_listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let reunion_addr = reunion_listener.local_addr().unwrap();
    tokio::spawn(
        Server::builder()
            .add_service(ReunionServiceServer::new(ReunionServiceGrpcService::new(
                MemoryReunionStorage::default(),
            )))
            .serve_with_incoming(TcpListenerStream::new(reunion_listener)),
    );

    let users = UserServiceClient::new(
        Channel::from_shared(format!("http://{user_addr}"))
            .unwrap()
            .connect_lazy(),
    );
    let reunions = ReunionServiceClient::new(
        Channel::from_shared(format!("http://{reunion_addr}"))
            .unwrap()
            .connect_lazy(),
    );

    (users, reunions)
}
