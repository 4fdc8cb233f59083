//! Tool radius, tool offset and work-zero offset reads.
//!
//! Each read is reachable as a POST with a JSON body and as a GET with the
//! same parameters in the path.

use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use cnc_link_common::{
    ToolOffsetData, ToolOffsetRequest, ToolOffsetsRangeRequest, ToolRadiusData,
    ToolRadiusRequest, WorkZeroOffsetData, WorkZeroOffsetRequest, WorkZeroOffsetsRangeRequest,
    WorkZeroOffsetsRangeSingleRequest,
};

use super::{body, params, run, FocasJson};
use crate::state::AppState;

type JsonBody<T> = Result<Json<T>, JsonRejection>;
type PathParams<T> = Result<Path<T>, PathRejection>;

/// Build the offsets router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tool-radius", post(tool_radius))
        .route("/tool-radius/:tool_number", get(tool_radius_by_path))
        .route("/tool-offsets", post(tool_offsets))
        .route("/tool-offsets/:tool_number", get(tool_offsets_by_path))
        .route("/tool-offsets-range", post(tool_offsets_range))
        .route("/tool-offsets-range/:start/:end", get(tool_offsets_range_by_path))
        .route("/work-zero-offsets-range", post(work_zero_offsets_range))
        .route(
            "/work-zero-offsets-range/:start/:end",
            get(work_zero_offsets_range_by_path),
        )
        .route("/work-zero-offset", post(work_zero_offset))
        .route("/work-zero-offset/:number/:axis", get(work_zero_offset_by_path))
        .route(
            "/work-zero-offset/:number/:axis/:length",
            get(work_zero_offset_with_length),
        )
        .route(
            "/work-zero-offsets-range-single",
            post(work_zero_offsets_range_single),
        )
        .route(
            "/work-zero-offsets-range-single/:axis/:start/:end",
            get(work_zero_offsets_range_single_by_path),
        )
}

// Tool radius

async fn tool_radius(
    State(state): State<Arc<AppState>>,
    payload: JsonBody<ToolRadiusRequest>,
) -> FocasJson<ToolRadiusData> {
    run(&state, body(payload), |link, request| {
        link.tool_radius(request.tool_group, request.tool_number)
    })
    .await
}

/// GET variant reads the tool in the group currently in use.
async fn tool_radius_by_path(
    State(state): State<Arc<AppState>>,
    path: PathParams<i16>,
) -> FocasJson<ToolRadiusData> {
    run(&state, params(path), |link, number| link.tool_radius(0, number)).await
}

// Tool offsets

async fn tool_offsets(
    State(state): State<Arc<AppState>>,
    payload: JsonBody<ToolOffsetRequest>,
) -> FocasJson<ToolOffsetData> {
    run(&state, body(payload), |link, request| {
        link.tool_offsets(request.tool_number)
    })
    .await
}

async fn tool_offsets_by_path(
    State(state): State<Arc<AppState>>,
    path: PathParams<i16>,
) -> FocasJson<ToolOffsetData> {
    run(&state, params(path), |link, number| link.tool_offsets(number)).await
}

async fn tool_offsets_range(
    State(state): State<Arc<AppState>>,
    payload: JsonBody<ToolOffsetsRangeRequest>,
) -> FocasJson<Vec<ToolOffsetData>> {
    run(&state, body(payload), |link, request| {
        link.tool_offsets_range(request.start_tool_number, request.end_tool_number)
    })
    .await
}

async fn tool_offsets_range_by_path(
    State(state): State<Arc<AppState>>,
    path: PathParams<(i16, i16)>,
) -> FocasJson<Vec<ToolOffsetData>> {
    run(&state, params(path), |link, (start, end)| {
        link.tool_offsets_range(start, end)
    })
    .await
}

// Work-zero offsets

async fn work_zero_offsets_range(
    State(state): State<Arc<AppState>>,
    payload: JsonBody<WorkZeroOffsetsRangeRequest>,
) -> FocasJson<Vec<WorkZeroOffsetData>> {
    run(&state, body(payload), |link, request| {
        link.work_zero_offsets_range(request.start_coord_sys, request.end_coord_sys)
    })
    .await
}

async fn work_zero_offsets_range_by_path(
    State(state): State<Arc<AppState>>,
    path: PathParams<(i16, i16)>,
) -> FocasJson<Vec<WorkZeroOffsetData>> {
    run(&state, params(path), |link, (start, end)| {
        link.work_zero_offsets_range(start, end)
    })
    .await
}

async fn work_zero_offset(
    State(state): State<Arc<AppState>>,
    payload: JsonBody<WorkZeroOffsetRequest>,
) -> FocasJson<WorkZeroOffsetData> {
    run(&state, body(payload), |link, request| {
        link.work_zero_offset(request.number, request.axis, request.length)
    })
    .await
}

async fn work_zero_offset_by_path(
    State(state): State<Arc<AppState>>,
    path: PathParams<(i16, i16)>,
) -> FocasJson<WorkZeroOffsetData> {
    run(&state, params(path), |link, (number, axis)| {
        link.work_zero_offset(number, axis, None)
    })
    .await
}

async fn work_zero_offset_with_length(
    State(state): State<Arc<AppState>>,
    path: PathParams<(i16, i16, i16)>,
) -> FocasJson<WorkZeroOffsetData> {
    run(&state, params(path), |link, (number, axis, length)| {
        link.work_zero_offset(number, axis, Some(length))
    })
    .await
}

async fn work_zero_offsets_range_single(
    State(state): State<Arc<AppState>>,
    payload: JsonBody<WorkZeroOffsetsRangeSingleRequest>,
) -> FocasJson<Vec<WorkZeroOffsetData>> {
    run(&state, body(payload), |link, request| {
        link.work_zero_offsets_range_single(
            request.axis,
            request.start_number,
            request.end_number,
            request.length,
        )
    })
    .await
}

async fn work_zero_offsets_range_single_by_path(
    State(state): State<Arc<AppState>>,
    path: PathParams<(i16, i16, i16)>,
) -> FocasJson<Vec<WorkZeroOffsetData>> {
    run(&state, params(path), |link, (axis, start, end)| {
        link.work_zero_offsets_range_single(axis, start, end, None)
    })
    .await
}
