diesel::table! {
    events (id) {
        id -> Uuid,
        title -> Text,
        description -> Nullable<Text>,
        date -> Date,
        time -> Text,
        venue -> Text,
        image_url -> Nullable<Text>,
        organizer -> Nullable<Text>,
        category -> Text,
        capacity -> Int4,
        registered_count -> Int4,
        status -> Text,
        archived -> Bool,
        custom_fields -> Nullable<Jsonb>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    ticket_types (id) {
        id -> Uuid,
        event_id -> Uuid,
        name -> Text,
        description -> Nullable<Text>,
        price -> Int8,
        quantity -> Int4,
        sold -> Int4,
        start_date -> Nullable<Timestamp>,
        end_date -> Nullable<Timestamp>,
        created_at -> Timestamp,
    }
}

diesel::table! {
    registrations (id) {
        id -> Uuid,
        event_id -> Uuid,
        ticket_type_id -> Uuid,
        name -> Text,
        email -> Text,
        phone -> Nullable<Text>,
        ticket_id -> Text,
        amount -> Int8,
        status -> Text,
        payment_status -> Text,
        payment_reference -> Nullable<Text>,
        custom_field_values -> Nullable<Jsonb>,
        checked_in_at -> Nullable<Timestamp>,
        created_at -> Timestamp,
        updated_at -> Timestamp,
    }
}

diesel::table! {
    user_roles (id) {
        id -> Uuid,
        user_id -> Uuid,
        role -> Text,
        created_at -> Timestamp,
    }
}

diesel::table! {
    phone_otps (id) {
        id -> Uuid,
        phone -> Text,
        code -> Text,
        expires_at -> Timestamp,
        used -> Bool,
        created_at -> Timestamp,
    }
}

diesel::joinable!(ticket_types -> events (event_id));
diesel::joinable!(registrations -> events (event_id));
diesel::joinable!(registrations -> ticket_types (ticket_type_id));

diesel::allow_tables_to_appear_in_same_query!(events, ticket_types, registrations);
