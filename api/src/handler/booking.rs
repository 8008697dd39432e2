use axum::{
    extract::{Path, State},
    Json,
};
use kernel::model::id::{BookingId, RoomId};
use registry::AppRegistry;
use shared::error::AppResult;

use crate::{
    extractor::AuthorizedUser,
    model::booking::{BookingRecordResponse, BookingRequest, BookingResponse},
};

pub async fn show_booking(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
) -> AppResult<Json<BookingResponse>> {
    registry
        .booking_service()
        .find_booking(user.id())
        .await
        .map(BookingResponse::from)
        .map(Json)
}

pub async fn create_booking(
    user: AuthorizedUser,
    State(registry): State<AppRegistry>,
    req: Option<Json<BookingRequest>>,
) -> AppResult<Json<BookingRecordResponse>> {
    let room_id = validated_room_id(req)?;

    registry
        .booking_service()
        .create_booking(user.id(), room_id)
        .await
        .map(BookingRecordResponse::from)
        .map(Json)
}

pub async fn update_booking(
    user: AuthorizedUser,
    Path(booking_id): Path<String>,
    State(registry): State<AppRegistry>,
    req: Option<Json<BookingRequest>>,
) -> AppResult<Json<BookingRecordResponse>> {
    let room_id = validated_room_id(req)?;

    // 数値でない ID はどの予約にも一致しないものとして扱う。
    // 予約 ID は 1 から採番されるので 0 は存在しない
    let booking_id = booking_id
        .parse::<i32>()
        .map(BookingId::new)
        .unwrap_or_else(|_| BookingId::new(0));

    registry
        .booking_service()
        .update_booking(booking_id, user.id(), room_id)
        .await
        .map(BookingRecordResponse::from)
        .map(Json)
}

// ボディが無い・JSON として読めない場合も roomId 未指定と同じ扱いにする
fn validated_room_id(req: Option<Json<BookingRequest>>) -> AppResult<RoomId> {
    let req = req.map(|Json(req)| req).unwrap_or_default();
    Ok(req.into_room_id()?)
}
