// Mirrors CREATE_ISS_POSITION_TABLE in db/iss_position/queries.rs.

diesel::table! {
    iss_position (id) {
        id -> Int4,
        timestamp -> Nullable<Int4>,
        latitude -> Nullable<Float8>,
        longitude -> Nullable<Float8>,
    }
}
