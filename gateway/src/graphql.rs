//! GraphQL surface: queries and mutations wrapping the same remote
//! operations as the REST routes. `create*` mutations generate a fresh
//! UUID before calling the shared upsert RPC; `update*` mutations pass
//! the caller's id to the identical RPC.

use async_graphql::http::GraphiQLSource;
use async_graphql::{Context, EmptySubscription, Object, Result, Schema, SimpleObject, ID};
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::post;
use axum::Router;
use tonic::transport::Channel;
use uuid::Uuid;

use reunio_reunion_service::proto as reunionpb;
use reunio_reunion_service::proto::reunion_service_client::ReunionServiceClient;
use reunio_user_service::proto as userpb;
use reunio_user_service::proto::user_service_client::UserServiceClient;

pub type AppSchema = Schema<Query, Mutation, EmptySubscription>;

/// Build the schema with one client handle per backend service.
pub fn build_schema(
    users: UserServiceClient<Channel>,
    reunions: ReunionServiceClient<Channel>,
) -> AppSchema {
    Schema::build(Query, Mutation, EmptySubscription)
        .data(users)
        .data(reunions)
        .finish()
}

/// GraphQL routes: POST at the gateway root and at `/graphql`, with
/// GraphiQL served on GET.
pub fn routes(schema: AppSchema) -> Router {
    Router::new()
        .route("/", post(graphql_handler).get(graphiql))
        .route("/graphql", post(graphql_handler).get(graphiql))
        .with_state(schema)
}

async fn graphql_handler(State(schema): State<AppSchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint("/graphql").finish())
}

#[derive(SimpleObject, Clone)]
pub struct User {
    pub id: ID,
    pub name: String,
    pub email: String,
}

impl From<userpb::User> for User {
    fn from(user: userpb::User) -> Self {
        Self {
            id: ID(user.id),
            name: user.name,
            email: user.email,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct Reunion {
    pub id: ID,
    pub sujet: String,
    pub location: String,
    pub date: String,
    #[graphql(name = "user_ids")]
    pub user_ids: Vec<ID>,
}

impl From<reunionpb::Reunion> for Reunion {
    fn from(reunion: reunionpb::Reunion) -> Self {
        Self {
            id: ID(reunion.id),
            sujet: reunion.sujet,
            location: reunion.location,
            date: reunion.date,
            user_ids: reunion.user_ids.into_iter().map(ID).collect(),
        }
    }
}

#[derive(SimpleObject)]
pub struct DeleteUserResponse {
    pub success: bool,
    pub message: String,
}

#[derive(SimpleObject)]
pub struct DeleteReunionResponse {
    pub success: bool,
    pub message: String,
}

fn remote_error(status: tonic::Status) -> async_graphql::Error {
    async_graphql::Error::new(status.message().to_owned())
}

fn empty_response() -> async_graphql::Error {
    async_graphql::Error::new("backend returned an empty response")
}

pub struct Query;

#[Object]
impl Query {
    async fn get_user(&self, ctx: &Context<'_>, id: ID) -> Result<User> {
        let mut client = ctx.data_unchecked::<UserServiceClient<Channel>>().clone();
        let response = client
            .get_user(userpb::GetUserRequest { user_id: id.0 })
            .await
            .map_err(remote_error)?;
        let user = response.into_inner().user.ok_or_else(empty_response)?;
        Ok(user.into())
    }

    async fn get_users(&self, ctx: &Context<'_>) -> Result<Vec<User>> {
        let mut client = ctx.data_unchecked::<UserServiceClient<Channel>>().clone();
        let response = client
            .get_users(userpb::GetUsersRequest {})
            .await
            .map_err(remote_error)?;
        Ok(response
            .into_inner()
            .users
            .into_iter()
            .map(User::from)
            .collect())
    }

    async fn get_reunion(&self, ctx: &Context<'_>, id: ID) -> Result<Reunion> {
        let mut client = ctx
            .data_unchecked::<ReunionServiceClient<Channel>>()
            .clone();
        let response = client
            .get_reunion(reunionpb::GetReunionRequest { reunion_id: id.0 })
            .await
            .map_err(remote_error)?;
        let reunion = response.into_inner().reunion.ok_or_else(empty_response)?;
        Ok(reunion.into())
    }

    async fn get_reunions(&self, ctx: &Context<'_>) -> Result<Vec<Reunion>> {
        let mut client = ctx
            .data_unchecked::<ReunionServiceClient<Channel>>()
            .clone();
        let response = client
            .get_reunions(reunionpb::GetReunionsRequest {})
            .await
            .map_err(remote_error)?;
        Ok(response
            .into_inner()
            .reunions
            .into_iter()
            .map(Reunion::from)
            .collect())
    }
}

pub struct Mutation;

#[Object]
impl Mutation {
    async fn create_user(&self, ctx: &Context<'_>, name: String, email: String) -> Result<User> {
        upsert_user(ctx, Uuid::new_v4().to_string(), name, email).await
    }

    async fn update_user(
        &self,
        ctx: &Context<'_>,
        id: ID,
        name: Option<String>,
        email: Option<String>,
    ) -> Result<User> {
        upsert_user(
            ctx,
            id.0,
            name.unwrap_or_default(),
            email.unwrap_or_default(),
        )
        .await
    }

    async fn delete_user(&self, ctx: &Context<'_>, id: ID) -> Result<DeleteUserResponse> {
        let mut client = ctx.data_unchecked::<UserServiceClient<Channel>>().clone();
        let response = client
            .delete_user(userpb::DeleteUserRequest { user_id: id.0 })
            .await
            .map_err(remote_error)?
            .into_inner();
        Ok(DeleteUserResponse {
            success: response.success,
            message: response.message,
        })
    }

    async fn create_reunion(
        &self,
        ctx: &Context<'_>,
        sujet: String,
        location: String,
        date: String,
        #[graphql(name = "user_ids")] user_ids: Vec<ID>,
    ) -> Result<Reunion> {
        upsert_reunion(
            ctx,
            Uuid::new_v4().to_string(),
            sujet,
            location,
            date,
            user_ids,
        )
        .await
    }

    async fn update_reunion(
        &self,
        ctx: &Context<'_>,
        id: ID,
        sujet: Option<String>,
        location: Option<String>,
        date: Option<String>,
        #[graphql(name = "user_ids")] user_ids: Option<Vec<ID>>,
    ) -> Result<Reunion> {
        upsert_reunion(
            ctx,
            id.0,
            sujet.unwrap_or_default(),
            location.unwrap_or_default(),
            date.unwrap_or_default(),
            user_ids.unwrap_or_default(),
        )
        .await
    }

    async fn delete_reunion(&self, ctx: &Context<'_>, id: ID) -> Result<DeleteReunionResponse> {
        let mut client = ctx
            .data_unchecked::<ReunionServiceClient<Channel>>()
            .clone();
        let response = client
            .delete_reunion(reunionpb::DeleteReunionRequest { reunion_id: id.0 })
            .await
            .map_err(remote_error)?
            .into_inner();
        Ok(DeleteReunionResponse {
            success: response.success,
            message: response.message,
        })
    }
}

async fn upsert_user(ctx: &Context<'_>, id: String, name: String, email: String) -> Result<User> {
    let mut client = ctx.data_unchecked::<UserServiceClient<Channel>>().clone();
    let response = client
        .create_or_update_user(userpb::CreateOrUpdateUserRequest {
            user_id: id,
            name,
            email,
        })
        .await
        .map_err(remote_error)?;
    let user = response.into_inner().user.ok_or_else(empty_response)?;
    Ok(user.into())
}

async fn upsert_reunion(
    ctx: &Context<'_>,
    id: String,
    sujet: String,
    location: String,
    date: String,
    user_ids: Vec<ID>,
) -> Result<Reunion> {
    let mut client = ctx
        .data_unchecked::<ReunionServiceClient<Channel>>()
        .clone();
    let response = client
        .create_or_update_reunion(reunionpb::CreateOrUpdateReunionRequest {
            reunion_id: id,
            sujet,
            date,
            location,
            user_ids: user_ids.into_iter().map(|id| id.0).collect(),
        })
        .await
        .map_err(remote_error)?;
    let reunion = response.into_inner().reunion.ok_or_else(empty_response)?;
    Ok(reunion.into())
}
