//! gRPC service implementation over a [`UserStorage`] backend.

use tonic::{Request, Response, Status};

use crate::proto::user_service_server::UserService;
use crate::proto::{
    CreateOrUpdateUserRequest, CreateOrUpdateUserResponse, DeleteUserRequest, DeleteUserResponse,
    GetUserRequest, GetUserResponse, GetUsersRequest, GetUsersResponse, User,
};
use crate::storage::UserStorage;

pub struct UserServiceGrpcService<S> {
    storage: S,
}

impl<S> UserServiceGrpcService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }
}

#[tonic::async_trait]
impl<S: UserStorage> UserService for UserServiceGrpcService<S> {
    async fn get_users(
        &self,
        _request: Request<GetUsersRequest>,
    ) -> Result<Response<GetUsersResponse>, Status> {
        let users = self.storage.list_users().await?;
        Ok(Response::new(GetUsersResponse { users }))
    }

    async fn get_user(
        &self,
        request: Request<GetUserRequest>,
    ) -> Result<Response<GetUserResponse>, Status> {
        let GetUserRequest { user_id } = request.into_inner();
        let user = self.storage.get_user(&user_id).await?;
        Ok(Response::new(GetUserResponse { user: Some(user) }))
    }

    async fn create_or_update_user(
        &self,
        request: Request<CreateOrUpdateUserRequest>,
    ) -> Result<Response<CreateOrUpdateUserResponse>, Status> {
        let CreateOrUpdateUserRequest {
            user_id,
            name,
            email,
        } = request.into_inner();
        let user = self
            .storage
            .upsert_user(User {
                id: user_id,
                name,
                email,
            })
            .await?;
        Ok(Response::new(CreateOrUpdateUserResponse {
            user: Some(user),
        }))
    }

    async fn delete_user(
        &self,
        request: Request<DeleteUserRequest>,
    ) -> Result<Response<DeleteUserResponse>, Status> {
        let DeleteUserRequest { user_id } = request.into_inner();
        self.storage.delete_user(&user_id).await?;
        Ok(Response::new(DeleteUserResponse {
            success: true,
            message: format!("user {user_id} deleted"),
        }))
    }
}
