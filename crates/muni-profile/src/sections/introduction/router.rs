use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;

use super::domain::{Locale, MunicipalityId, ParamsError, SectionParams};
use super::manager::{IntroductionManager, SectionBuildError};
use super::provider::{FactProvider, ProviderError};
use super::store::ContentStore;

/// Router builder exposing the introduction section over HTTP.
pub fn introduction_router<P, S>(manager: Arc<IntroductionManager<P, S>>) -> Router
where
    P: FactProvider + 'static,
    S: ContentStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/sections/introduction/:municipality_id",
            get(introduction_handler::<P, S>),
        )
        .with_state(manager)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct IntroductionQuery {
    locale: Option<String>,
    include_chart: Option<bool>,
    as_of: Option<NaiveDate>,
}

impl IntroductionQuery {
    fn into_params(self) -> Result<SectionParams, ParamsError> {
        let locale = match self.locale {
            Some(tag) => Locale::from_tag(&tag).ok_or(ParamsError::UnknownLocale(tag))?,
            None => Locale::default(),
        };
        Ok(SectionParams {
            locale,
            include_chart: self.include_chart.unwrap_or(true),
            as_of: self.as_of,
        })
    }
}

pub(crate) async fn introduction_handler<P, S>(
    State(manager): State<Arc<IntroductionManager<P, S>>>,
    Path(municipality_id): Path<String>,
    Query(query): Query<IntroductionQuery>,
) -> Response
where
    P: FactProvider + 'static,
    S: ContentStore + 'static,
{
    let params = match query.into_params() {
        Ok(params) => params,
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
        }
    };

    let municipality = MunicipalityId(municipality_id);
    match manager.get(&municipality, params).await {
        Ok(content) => (StatusCode::OK, axum::Json(content)).into_response(),
        Err(err) => error_response(err),
    }
}

fn error_response(err: SectionBuildError) -> Response {
    let status = match &err {
        SectionBuildError::InvalidParams(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SectionBuildError::DataUnavailable(ProviderError::UnknownMunicipality(_)) => {
            StatusCode::NOT_FOUND
        }
        SectionBuildError::DataUnavailable(ProviderError::Unavailable(_))
        | SectionBuildError::BuildTimeout => StatusCode::SERVICE_UNAVAILABLE,
        SectionBuildError::MalformedFacts(_) | SectionBuildError::Store(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    let payload = json!({ "error": err.to_string() });
    (status, axum::Json(payload)).into_response()
}
