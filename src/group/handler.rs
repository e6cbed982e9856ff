pub(super) mod api {
    use axum::{Json, body::Bytes, extract::State, http::HeaderMap};
    use serde::Deserialize;
    use serde_json::{Value, json};

    use crate::{
        extract::{self, Path, Query},
        group, identity,
    };

    #[derive(Deserialize, Default)]
    pub struct CreateParams {
        name: Option<String>,
        description: Option<String>,
        topic: Option<String>,
        user_id: Option<String>,
    }

    pub async fn create(
        headers: HeaderMap,
        Query(query): Query<identity::Params>,
        group_service: State<group::Service>,
        body: Bytes,
    ) -> crate::Result<Json<Value>> {
        let params = extract::json::<CreateParams>(&body);
        let owner = identity::Context::new(&headers)
            .with_body(params.as_ref().ok().and_then(|p| p.user_id.as_deref()))
            .with_query(query.user_id.as_deref())
            .require()?;
        let params = params?;

        let group = group_service
            .create(
                &owner,
                params.name.as_deref().unwrap_or_default(),
                params.description.as_deref(),
                params.topic.as_deref(),
            )
            .await?;

        Ok(Json(json!({ "group": group })))
    }

    pub async fn find_all(group_service: State<group::Service>) -> crate::Result<Json<Value>> {
        let groups = group_service.find_all().await?;
        Ok(Json(json!({ "groups": groups })))
    }

    pub async fn find_one(
        Path(id): Path<group::Id>,
        group_service: State<group::Service>,
    ) -> crate::Result<Json<Value>> {
        let group = group_service.find_by_id(&id).await?;
        Ok(Json(json!({ "group": group })))
    }

    pub async fn join(
        headers: HeaderMap,
        Path(id): Path<group::Id>,
        Query(query): Query<identity::Params>,
        group_service: State<group::Service>,
        body: Bytes,
    ) -> crate::Result<Json<Value>> {
        let body = identity::Params::from_body(&body);
        let user_id = identity::Context::new(&headers)
            .with_body(body.user_id.as_deref())
            .with_query(query.user_id.as_deref())
            .require()?;

        let member = group_service.join(&id, &user_id).await?;
        Ok(Json(json!({ "member": member })))
    }

    pub async fn leave(
        headers: HeaderMap,
        Path(id): Path<group::Id>,
        Query(query): Query<identity::Params>,
        group_service: State<group::Service>,
        body: Bytes,
    ) -> crate::Result<Json<Value>> {
        let body = identity::Params::from_body(&body);
        let user_id = identity::Context::new(&headers)
            .with_body(body.user_id.as_deref())
            .with_query(query.user_id.as_deref())
            .require()?;

        group_service.leave(&id, &user_id).await?;
        Ok(Json(json!({ "ok": true })))
    }

    pub async fn find_joined(
        headers: HeaderMap,
        Query(query): Query<identity::Params>,
        group_service: State<group::Service>,
        body: Bytes,
    ) -> crate::Result<Json<Value>> {
        let body = identity::Params::from_body(&body);
        let user_id = identity::Context::new(&headers)
            .with_body(body.user_id.as_deref())
            .with_query(query.user_id.as_deref())
            .require()?;

        let groups = group_service.find_joined(&user_id).await?;
        Ok(Json(json!({ "groups": groups })))
    }
}
