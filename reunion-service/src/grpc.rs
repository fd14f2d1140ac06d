//! gRPC service implementation over a [`ReunionStorage`] backend.

use tonic::{Request, Response, Status};

use crate::proto::reunion_service_server::ReunionService;
use crate::proto::{
    AddUserToReunionRequest, AddUserToReunionResponse, CreateOrUpdateReunionRequest,
    CreateOrUpdateReunionResponse, DeleteReunionRequest, DeleteReunionResponse, GetReunionRequest,
    GetReunionResponse, GetReunionsRequest, GetReunionsResponse,
    RemoveUserFromReunionRequest, RemoveUserFromReunionResponse, Reunion,
};
use crate::storage::ReunionStorage;

pub struct ReunionServiceGrpcService<S> {
    storage: S,
}

impl<S> ReunionServiceGrpcService<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }
}

#[tonic::async_trait]
impl<S: ReunionStorage> ReunionService for ReunionServiceGrpcService<S> {
    async fn get_reunions(
        &self,
        _request: Request<GetReunionsRequest>,
    ) -> Result<Response<GetReunionsResponse>, Status> {
        let reunions = self.storage.list_reunions().await?;
        Ok(Response::new(GetReunionsResponse { reunions }))
    }

    async fn get_reunion(
        &self,
        request: Request<GetReunionRequest>,
    ) -> Result<Response<GetReunionResponse>, Status> {
        let GetReunionRequest { reunion_id } = request.into_inner();
        let reunion = self.storage.get_reunion(&reunion_id).await?;
        Ok(Response::new(GetReunionResponse {
            reunion: Some(reunion),
        }))
    }

    async fn create_or_update_reunion(
        &self,
        request: Request<CreateOrUpdateReunionRequest>,
    ) -> Result<Response<CreateOrUpdateReunionResponse>, Status> {
        let CreateOrUpdateReunionRequest {
            reunion_id,
            sujet,
            date,
            location,
            user_ids,
        } = request.into_inner();
        let reunion = self
            .storage
            .upsert_reunion(Reunion {
                id: reunion_id,
                sujet,
                date,
                location,
                user_ids,
            })
            .await?;
        Ok(Response::new(CreateOrUpdateReunionResponse {
            reunion: Some(reunion),
        }))
    }

    async fn delete_reunion(
        &self,
        request: Request<DeleteReunionRequest>,
    ) -> Result<Response<DeleteReunionResponse>, Status> {
        let DeleteReunionRequest { reunion_id } = request.into_inner();
        self.storage.delete_reunion(&reunion_id).await?;
        Ok(Response::new(DeleteReunionResponse {
            success: true,
            message: format!("reunion {reunion_id} deleted"),
        }))
    }

    async fn add_user_to_reunion(
        &self,
        request: Request<AddUserToReunionRequest>,
    ) -> Result<Response<AddUserToReunionResponse>, Status> {
        let AddUserToReunionRequest {
            reunion_id,
            user_id,
        } = request.into_inner();
        self.storage.add_participant(&reunion_id, &user_id).await?;
        Ok(Response::new(AddUserToReunionResponse {
            message: format!("user {user_id} added to reunion {reunion_id}"),
        }))
    }

    async fn remove_user_from_reunion(
        &self,
        request: Request<RemoveUserFromReunionRequest>,
    ) -> Result<Response<RemoveUserFromReunionResponse>, Status> {
        let RemoveUserFromReunionRequest {
            reunion_id,
            user_id,
        } = request.into_inner();
        self.storage
            .remove_participant(&reunion_id, &user_id)
            .await?;
        Ok(Response::new(RemoveUserFromReunionResponse {
            message: format!("user {user_id} removed from reunion {reunion_id}"),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryReunionStorage;
    use tonic::Code;

    fn service() -> ReunionServiceGrpcService<MemoryReunionStorage> {
        ReunionServiceGrpcService::new(MemoryReunionStorage::default())
    }

    async fn seed(
        svc: &ReunionServiceGrpcService<MemoryReunionStorage>,
        id: &str,
        user_ids: &[&str],
    ) {
        svc.create_or_update_reunion(Request::new(CreateOrUpdateReunionRequest {
            reunion_id: id.into(),
            sujet: "planning".into(),
            date: "2024-01-01".into(),
            location: "room 1".into(),
            user_ids: user_ids.iter().map(|s| s.to_string()).collect(),
        }))
        .await
        .unwrap();
    }

    async fn participants(
        svc: &ReunionServiceGrpcService<MemoryReunionStorage>,
        id: &str,
    ) -> Vec<String> {
        svc.get_reunion(Request::new(GetReunionRequest {
            reunion_id: id.into(),
        }))
        .await
        .unwrap()
        .into_inner()
        .reunion
        .unwrap()
        .user_ids
    }

    #[tokio::test]
    async fn add_participant_appends_without_dedup() {
        let svc = service();
        seed(&svc, "m1", &["u1"]).await;

        for _ in 0..2 {
            svc.add_user_to_reunion(Request::new(AddUserToReunionRequest {
                reunion_id: "m1".into(),
                user_id: "u2".into(),
            }))
            .await
            .unwrap();
        }

        assert_eq!(participants(&svc, "m1").await, vec!["u1", "u2", "u2"]);
    }

    #[tokio::test]
    async fn add_participant_to_missing_reunion_is_not_found() {
        let svc = service();
        let err = svc
            .add_user_to_reunion(Request::new(AddUserToReunionRequest {
                reunion_id: "nope".into(),
                user_id: "u1".into(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::NotFound);
    }

    #[tokio::test]
    async fn remove_participant_at_any_position() {
        let svc = service();
        for (id, users, victim, expected) in [
            ("m1", vec!["u1", "u2", "u3"], "u1", vec!["u2", "u3"]),
            ("m2", vec!["u1", "u2", "u3"], "u2", vec!["u1", "u3"]),
            ("m3", vec!["u1", "u2", "u3"], "u3", vec!["u1", "u2"]),
            ("m4", vec!["u1"], "u1", vec![]),
        ] {
            seed(&svc, id, &users).await;
            svc.remove_user_from_reunion(Request::new(RemoveUserFromReunionRequest {
                reunion_id: id.into(),
                user_id: victim.into(),
            }))
            .await
            .unwrap();
            assert_eq!(participants(&svc, id).await, expected, "reunion {id}");
        }
    }

    #[tokio::test]
    async fn remove_participant_drops_every_occurrence() {
        let svc = service();
        seed(&svc, "m1", &["u1", "u2", "u1"]).await;

        svc.remove_user_from_reunion(Request::new(RemoveUserFromReunionRequest {
            reunion_id: "m1".into(),
            user_id: "u1".into(),
        }))
        .await
        .unwrap();

        assert_eq!(participants(&svc, "m1").await, vec!["u2"]);
    }

    #[tokio::test]
    async fn remove_participant_leaves_substring_ids_alone() {
        let svc = service();
        seed(&svc, "m1", &["u1", "u12"]).await;

        svc.remove_user_from_reunion(Request::new(RemoveUserFromReunionRequest {
            reunion_id: "m1".into(),
            user_id: "u1".into(),
        }))
        .await
        .unwrap();

        assert_eq!(participants(&svc, "m1").await, vec!["u12"]);
    }

    #[tokio::test]
    async fn delete_missing_reunion_is_not_found() {
        let svc = service();
        let err = svc
            .delete_reunion(Request::new(DeleteReunionRequest {
                reunion_id: "nope".into(),
            }))
            .await
            .unwrap_err();
        assert_eq!(err.code(), Code::NotFound);
    }
}
