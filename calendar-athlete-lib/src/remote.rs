//src/remote.rs
use crate::model::{DayName, Plan, Workout};
use crate::store::{PlanStore, StoreError, WorkoutStore};
use chrono::NaiveDate;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, error};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Document store reached over HTTP.
///
/// Layout of the API:
///
/// * `GET/PUT/DELETE {base}/users/{uid}/workouts/{YYYY-MM-DD}`
/// * `GET/PUT {base}/users/{uid}/plans/{day}`
/// * `GET {base}/users/{uid}/plans` returning a `{ "monday": {..}, .. }` object
///
/// A 404 on a GET means the document does not exist.
pub struct RemoteStore {
    http_client: Client,
    server_url: String,
}

impl RemoteStore {
    pub fn new(server_url: impl Into<String>) -> Result<Self, StoreError> {
        let http_client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http_client,
            server_url: server_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn workout_url(&self, user_id: &str, date: NaiveDate) -> String {
        format!(
            "{}/users/{}/workouts/{}",
            self.server_url,
            user_id,
            date.format("%Y-%m-%d")
        )
    }

    fn plans_url(&self, user_id: &str) -> String {
        format!("{}/users/{}/plans", self.server_url, user_id)
    }

    fn plan_url(&self, user_id: &str, day: DayName) -> String {
        format!("{}/{}", self.plans_url(user_id), day)
    }

    fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<Option<T>, StoreError> {
        debug!(url, "GET");
        let response = self.http_client.get(url).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = check_status(response)?;
        Ok(Some(response.json()?))
    }

    fn put_json<T: Serialize>(&self, url: &str, body: &T) -> Result<(), StoreError> {
        debug!(url, "PUT");
        let response = self.http_client.put(url).json(body).send()?;
        check_status(response).map(|_| ())
    }

    fn delete(&self, url: &str) -> Result<(), StoreError> {
        debug!(url, "DELETE");
        let response = self.http_client.delete(url).send()?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        check_status(response).map(|_| ())
    }
}

fn check_status(response: Response) -> Result<Response, StoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response
        .text()
        .unwrap_or_else(|_| "Could not read error body".to_string());
    error!(status = status.as_u16(), %body, "remote store request failed");
    Err(StoreError::Status {
        status: status.as_u16(),
        body,
    })
}

impl WorkoutStore for RemoteStore {
    fn get_workout(&self, user_id: &str, date: NaiveDate) -> Result<Option<Workout>, StoreError> {
        self.get_json(&self.workout_url(user_id, date))
    }

    fn save_workout(
        &self,
        user_id: &str,
        date: NaiveDate,
        workout: &Workout,
    ) -> Result<(), StoreError> {
        self.put_json(&self.workout_url(user_id, date), workout)
    }

    fn delete_workout(&self, user_id: &str, date: NaiveDate) -> Result<(), StoreError> {
        self.delete(&self.workout_url(user_id, date))
    }
}

impl PlanStore for RemoteStore {
    fn get_plan(&self, user_id: &str, day: DayName) -> Result<Option<Plan>, StoreError> {
        self.get_json(&self.plan_url(user_id, day))
    }

    fn save_plan(&self, user_id: &str, day: DayName, plan: &Plan) -> Result<(), StoreError> {
        self.put_json(&self.plan_url(user_id, day), plan)
    }

    fn get_all_plans(&self, user_id: &str) -> Result<BTreeMap<DayName, Plan>, StoreError> {
        Ok(self
            .get_json::<BTreeMap<DayName, Plan>>(&self.plans_url(user_id))?
            .unwrap_or_default())
    }
}
