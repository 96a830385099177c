use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use dataroom_application::{ActorDirectory, ActorSnapshot};
use dataroom_core::{AppError, AppResult};
use dataroom_domain::{Group, GroupId};
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use url::Url;

mod payload;


use payload::{OcsGroupDetailsPage, OcsReply, OcsUser, decode_ocs_payload, member_count};

/// Connection settings for the platform's OCS provisioning API.
#[derive(Debug, Clone)]
pub struct OcsDirectoryConfig {
    /// Platform root, e.g. `https://cloud.example.com/`.
    pub base_url: Url,
    /// Service account user name.
    pub username: String,
    /// Service account app password.
    pub app_password: String,
    /// Page size used when listing groups.
    pub page_size: u32,
}

/// `ActorDirectory` backed by the OCS provisioning API.
pub struct OcsActorDirectory {
    http_client: reqwest::Client,
    config: OcsDirectoryConfig,
}

impl OcsActorDirectory {
    /// Creates a new OCS directory adapter.
    #[must_use]
    pub fn new(http_client: reqwest::Client, config: OcsDirectoryConfig) -> Self {
        Self {
            http_client,
            config: OcsDirectoryConfig {
                page_size: config.page_size.max(1),
                ..config
            },
        }
    }

    fn endpoint(&self, segments: &[&str], query: &[(&str, String)]) -> AppResult<Url> {
        let mut url = self.config.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                AppError::Internal(format!(
                    "OCS base url '{}' cannot carry a path",
                    self.config.base_url
                ))
            })?
            .pop_if_empty()
            .extend(["ocs", "v2.php"])
            .extend(segments);

        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("format", "json");
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    async fn get_ocs<T>(&self, url: Url) -> AppResult<OcsReply<T>>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(path = url.path(), "querying OCS endpoint");

        let response = self
            .http_client
            .get(url.clone())
            .basic_auth(&self.config.username, Some(&self.config.app_password))
            .header("OCS-APIRequest", "true")
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| {
                AppError::Upstream(format!("OCS request to '{}' failed: {error}", url.path()))
            })?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(OcsReply::NotFound);
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(AppError::Upstream(format!(
                "OCS service account was rejected with status {status}"
            )));
        }
        if !status.is_success() {
            return Err(AppError::Upstream(format!(
                "OCS endpoint '{}' answered with status {status}",
                url.path()
            )));
        }

        let body = response.text().await.map_err(|error| {
            AppError::Upstream(format!("failed to read OCS response body: {error}"))
        })?;

        decode_ocs_payload(body.as_str())
    }

    async fn fetch_subadmin_groups(&self, user_id: &str) -> AppResult<Vec<String>> {
        let url = self.endpoint(&["cloud", "users", user_id, "subadmins"], &[])?;
        match self.get_ocs::<Value>(url).await? {
            OcsReply::Data(data) => Ok(string_list(data)),
            OcsReply::NotFound => Ok(Vec::new()),
        }
    }
}

#[async_trait]
impl ActorDirectory for OcsActorDirectory {
    async fn fetch_actor_snapshot(&self, user_id: &str) -> AppResult<Option<ActorSnapshot>> {
        if user_id.trim().is_empty() {
            return Ok(None);
        }

        let url = self.endpoint(&["cloud", "users", user_id], &[])?;
        let user = match self.get_ocs::<OcsUser>(url).await? {
            OcsReply::Data(user) => user,
            OcsReply::NotFound => {
                tracing::debug!(user_id, "platform does not know the actor");
                return Ok(None);
            }
        };

        let subadmin_groups = self.fetch_subadmin_groups(user_id).await?;
        Ok(Some(snapshot_from_ocs(
            user_id,
            string_list(user.groups),
            subadmin_groups,
        )))
    }

    async fn list_groups(&self) -> AppResult<Vec<Group>> {
        let page_size = self.config.page_size;
        let mut groups = Vec::new();
        let mut seen_ids = BTreeSet::new();
        let mut offset: u32 = 0;

        loop {
            let url = self.endpoint(
                &["cloud", "groups", "details"],
                &[
                    ("limit", page_size.to_string()),
                    ("offset", offset.to_string()),
                ],
            )?;
            let page = match self.get_ocs::<OcsGroupDetailsPage>(url).await? {
                OcsReply::Data(page) => page,
                OcsReply::NotFound => break,
            };

            let received = page.groups.len();
            let mut new_ids = 0_usize;
            for raw in page.groups {
                if !seen_ids.insert(raw.id.clone()) {
                    continue;
                }
                new_ids += 1;

                let display_name = raw.displayname.unwrap_or_default();
                match Group::new(raw.id.as_str(), display_name, member_count(&raw.usercount)) {
                    Ok(group) => groups.push(group),
                    Err(error) => {
                        tracing::warn!(group_id = raw.id.as_str(), %error, "skipping malformed group");
                    }
                }
            }

            if received < page_size as usize {
                break;
            }
            // A platform that ignores `offset` keeps answering with the same page.
            if new_ids == 0 {
                tracing::warn!(offset, "OCS group paging returned no new groups, stopping");
                break;
            }
            offset = offset.saturating_add(page_size);
        }

        Ok(groups)
    }
}

fn snapshot_from_ocs(
    user_id: &str,
    groups: Vec<String>,
    subadmin_groups: Vec<String>,
) -> ActorSnapshot {
    let group_memberships: BTreeSet<GroupId> = groups
        .into_iter()
        .filter_map(|value| GroupId::new(value).ok())
        .collect();
    let subadmin_group_assignments: BTreeMap<GroupId, bool> = subadmin_groups
        .into_iter()
        .filter_map(|value| GroupId::new(value).ok().map(|group_id| (group_id, true)))
        .collect();

    ActorSnapshot {
        user_id: user_id.to_owned(),
        is_admin: group_memberships.iter().any(GroupId::is_admin_group),
        group_memberships,
        subadmin_group_assignments,
    }
}

/// Accepts both JSON arrays and index-keyed objects, which the platform
/// emits for sparse lists.
fn string_list(value: Value) -> Vec<String> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawList {
        Array(Vec<Value>),
        Object(BTreeMap<String, Value>),
    }

    let values = match serde_json::from_value::<RawList>(value) {
        Ok(RawList::Array(values)) => values,
        Ok(RawList::Object(values)) => values.into_values().collect(),
        Err(_) => Vec::new(),
    };

    values
        .into_iter()
        .filter_map(|value| value.as_str().map(ToOwned::to_owned))
        .collect()
}
