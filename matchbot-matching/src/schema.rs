diesel::table! {
    profiles (user_id) {
        user_id -> BigInt,
        display_name -> Text,
        age -> Nullable<Integer>,
        gender -> Text,
        preference -> Text,
        interests -> Text,
        bio -> Text,
        handle -> Nullable<Text>,
        created_at -> Timestamp,
    }
}

diesel::table! {
    likes (liker_id, liked_id) {
        liker_id -> BigInt,
        liked_id -> BigInt,
        created_at -> Timestamp,
    }
}

diesel::table! {
    passes (passer_id, passed_id) {
        passer_id -> BigInt,
        passed_id -> BigInt,
        created_at -> Timestamp,
    }
}

diesel::table! {
    matches (user_a_id, user_b_id) {
        user_a_id -> BigInt,
        user_b_id -> BigInt,
        created_at -> Timestamp,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    profiles,
    likes,
    passes,
    matches,
);
