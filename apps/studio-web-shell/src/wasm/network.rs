use super::*;

    pub(super) struct HttpProjectFetcher {
        config: NavigationConfig,
    }

    impl HttpProjectFetcher {
        pub(super) fn new(config: NavigationConfig) -> Self {
            Self { config }
        }

        async fn request_project(
            &self,
            project_id: &str,
        ) -> Result<Option<ActiveProject>, FetchError> {
            let url = self.config.project_url(project_id);
            let response = Request::get(&url)
                .header("accept", "application/json")
                .send()
                .await
                .map_err(map_network_error)?;
            let status = response.status();
            let body = response.text().await.map_err(|error| FetchError::Decode {
                message: format!("failed to read project response: {error}"),
            })?;
            classify_project_response(status, &body)
        }
    }

    #[async_trait(?Send)]
    impl ProjectFetcher for HttpProjectFetcher {
        async fn fetch_project(
            &self,
            project_id: &str,
        ) -> Result<Option<ActiveProject>, FetchError> {
            let timeout_ms = self.config.fetch_timeout_ms;
            let request = self.request_project(project_id).fuse();
            let timeout = sleep(Duration::from_millis(timeout_ms)).fuse();
            pin_mut!(request, timeout);

            select! {
                result = request => result,
                () = timeout => Err(FetchError::Timeout { timeout_ms }),
            }
        }
    }

    pub(super) fn map_network_error(error: gloo_net::Error) -> FetchError {
        FetchError::Transport {
            message: error.to_string(),
        }
    }
