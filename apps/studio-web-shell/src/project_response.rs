use serde::Deserialize;
use studio_navigation::{ActiveProject, FetchError};

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ProjectBody {
    Bare(ActiveProject),
    Enveloped { data: Option<ActiveProject> },
}

/// Maps a project endpoint response onto the fetcher contract: missing
/// projects are `Ok(None)`, everything unexpected is an error.
pub(crate) fn classify_project_response(
    status: u16,
    body: &str,
) -> Result<Option<ActiveProject>, FetchError> {
    match status {
        200..=299 => decode_project_body(body),
        404 => Ok(None),
        401 | 403 => Err(FetchError::Unauthorized { status }),
        _ => Err(FetchError::Http { status }),
    }
}

fn decode_project_body(body: &str) -> Result<Option<ActiveProject>, FetchError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let decoded: ProjectBody = serde_json::from_str(body).map_err(|error| FetchError::Decode {
        message: error.to_string(),
    })?;
    let project = match decoded {
        ProjectBody::Bare(project) => Some(project),
        ProjectBody::Enveloped { data } => data,
    };
    match project {
        Some(project) if !project.has_valid_id() => Err(FetchError::Decode {
            message: "project record is missing an id".to_string(),
        }),
        project => Ok(project),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use studio_navigation::ProjectKind;

    #[test]
    fn decodes_enveloped_and_bare_projects() {
        let enveloped = classify_project_response(
            200,
            r#"{"data":{"id":"p1","name":"Reel","type":"video","owner_id":"u1"}}"#,
        )
        .expect("enveloped project")
        .expect("project present");
        assert_eq!(enveloped.id, "p1");
        assert_eq!(enveloped.kind, ProjectKind::Video);

        let bare =
            classify_project_response(200, r#"{"id":"p2","name":"Copy","type":"copywriting"}"#)
                .expect("bare project")
                .expect("project present");
        assert_eq!(bare.id, "p2");
    }

    #[test]
    fn missing_projects_are_not_errors() {
        assert_eq!(classify_project_response(404, "{\"error\":\"nope\"}"), Ok(None));
        assert_eq!(classify_project_response(200, r#"{"data":null}"#), Ok(None));
        assert_eq!(classify_project_response(204, ""), Ok(None));
    }

    #[test]
    fn auth_and_server_failures_are_errors() {
        assert_eq!(
            classify_project_response(401, ""),
            Err(FetchError::Unauthorized { status: 401 })
        );
        assert_eq!(
            classify_project_response(403, ""),
            Err(FetchError::Unauthorized { status: 403 })
        );
        assert_eq!(
            classify_project_response(502, "bad gateway"),
            Err(FetchError::Http { status: 502 })
        );
    }

    #[test]
    fn malformed_bodies_are_decode_errors() {
        assert!(matches!(
            classify_project_response(200, "<html>"),
            Err(FetchError::Decode { .. })
        ));
        assert!(matches!(
            classify_project_response(200, r#"{"data":{"id":"  ","name":"x"}}"#),
            Err(FetchError::Decode { .. })
        ));
    }
}
