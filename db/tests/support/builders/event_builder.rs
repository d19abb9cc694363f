use chrono::{Duration, NaiveDate, Utc};
use diesel::PgConnection;
use rand::prelude::*;

use gatelist_db::models::Event;

pub struct EventBuilder<'a> {
    title: String,
    date: NaiveDate,
    capacity: i32,
    archived: bool,
    connection: &'a mut PgConnection,
}

#[allow(dead_code)]
impl<'a> EventBuilder<'a> {
    pub fn new(connection: &'a mut PgConnection) -> EventBuilder<'a> {
        let x: u16 = random();
        EventBuilder {
            title: format!("Event {}", x),
            date: Utc::now().date_naive() + Duration::days(7),
            capacity: 0,
            archived: false,
            connection,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = date;
        self
    }

    pub fn with_capacity(mut self, capacity: i32) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn archived(mut self) -> Self {
        self.archived = true;
        self
    }

    pub fn finish(self) -> Event {
        let mut event = Event::create(
            self.title,
            self.date,
            "09:00".to_string(),
            "Accra International Conference Centre".to_string(),
            "Conference".to_string(),
        );
        event.capacity = self.capacity;
        event.archived = self.archived;
        event.commit(self.connection).unwrap()
    }
}
