pub(super) mod api {
    use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
    use serde::Deserialize;
    use serde_json::{Value, json};

    use crate::{
        extract::{self, Path, Query},
        group, identity,
        message::{self, Limit},
    };

    #[derive(Deserialize, Default)]
    pub struct CreateParams {
        content: Option<String>,
        user_id: Option<String>,
    }

    pub async fn create(
        headers: HeaderMap,
        Path(group_id): Path<group::Id>,
        Query(query): Query<identity::Params>,
        message_service: State<message::Service>,
        body: Bytes,
    ) -> crate::Result<Json<Value>> {
        let params = extract::json::<CreateParams>(&body);
        let user_id = identity::Context::new(&headers)
            .with_body(params.as_ref().ok().and_then(|p| p.user_id.as_deref()))
            .with_query(query.user_id.as_deref())
            .require()?;
        let params = params?;

        let msg = message_service
            .create(
                &group_id,
                &user_id,
                params.content.as_deref().unwrap_or_default(),
            )
            .await?;

        Ok(Json(json!({ "message": msg })))
    }

    #[derive(Deserialize)]
    pub struct FindAllParams {
        limit: Option<String>,
    }

    pub async fn find_all(
        Path(group_id): Path<group::Id>,
        Query(params): Query<FindAllParams>,
        message_service: State<message::Service>,
    ) -> crate::Result<Json<Value>> {
        let limit = Limit::parse(params.limit.as_deref())?;

        let messages = message_service.find_by_group_id(&group_id, limit).await?;
        Ok(Json(json!({ "messages": messages })))
    }
}
