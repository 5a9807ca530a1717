//! Handler for `/timetable/{grade}/{class}`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};

use timegrid_cache::ExternalDataCache;
use timegrid_core::{
  feed::Feed,
  store::FeedStore,
  timetable::{GradeTimetable, WeekTimetable},
};

use crate::error::ApiError;

/// `GET /timetable/{grade}/{class}` — one class's decoded week.
///
/// Indexes are the portal's own 0-based grade/class positions. `404` for
/// positions outside the decoded shape, `503` while no successful fetch
/// has ever completed.
pub async fn get_week<S>(
  State(cache): State<Arc<ExternalDataCache<S>>>,
  Path((grade, class)): Path<(usize, usize)>,
) -> Result<Json<WeekTimetable>, ApiError>
where
  S: FeedStore,
{
  let payload = cache.get(Feed::Timetable).await?;
  let table: GradeTimetable = serde_json::from_value(payload)
    .map_err(|e| ApiError::Upstream(Box::new(e)))?;

  let week = table
    .week(grade, class)
    .cloned()
    .ok_or_else(|| ApiError::NotFound(format!("no class {class} in grade {grade}")))?;

  Ok(Json(week))
}
