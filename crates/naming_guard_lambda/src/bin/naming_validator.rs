use lambda_runtime::{service_fn, Error, LambdaEvent};
use naming_guard_lambda::adapters::object_store::ObjectStore;
use naming_guard_lambda::config::ValidatorConfig;
use naming_guard_lambda::handlers::validate::{handle_validation_payload, ValidationOutcome};
use serde_json::Value;

struct S3ObjectStore {
    s3_client: aws_sdk_s3::Client,
}

impl ObjectStore for S3ObjectStore {
    fn object_exists(&self, bucket: &str, key: &str) -> Result<bool, String> {
        let bucket = bucket.to_string();
        let object_key = key.to_string();
        let client = self.s3_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                match client
                    .head_object()
                    .bucket(bucket)
                    .key(object_key.clone())
                    .send()
                    .await
                {
                    Ok(_) => Ok(true),
                    Err(error) => {
                        let service_error = error.into_service_error();
                        if service_error.is_not_found() {
                            Ok(false)
                        } else {
                            Err(format!(
                                "failed to look up '{object_key}' in s3: {service_error}"
                            ))
                        }
                    }
                }
            })
        })
    }

    fn copy_object(&self, bucket: &str, source_key: &str, target_key: &str) -> Result<(), String> {
        let copy_source = copy_source(bucket, source_key);
        let bucket = bucket.to_string();
        let target_key = target_key.to_string();
        let client = self.s3_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .copy_object()
                    .bucket(bucket)
                    .copy_source(copy_source)
                    .key(target_key)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| {
                        format!("failed to copy object in s3: {}", error.into_service_error())
                    })
            })
        })
    }

    fn delete_object(&self, bucket: &str, key: &str) -> Result<(), String> {
        let bucket = bucket.to_string();
        let object_key = key.to_string();
        let client = self.s3_client.clone();

        tokio::task::block_in_place(|| {
            tokio::runtime::Handle::current().block_on(async move {
                client
                    .delete_object()
                    .bucket(bucket)
                    .key(object_key)
                    .send()
                    .await
                    .map(|_| ())
                    .map_err(|error| {
                        format!(
                            "failed to delete object from s3: {}",
                            error.into_service_error()
                        )
                    })
            })
        })
    }
}

/// `CopySource` is `bucket/key` with each key segment URL-encoded.
fn copy_source(bucket: &str, key: &str) -> String {
    let encoded_key = key
        .split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/");
    format!("{bucket}/{encoded_key}")
}

async fn handle_request(event: LambdaEvent<Value>) -> Result<ValidationOutcome, Error> {
    let config = ValidatorConfig::from_env().map_err(Error::from)?;

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    let store = S3ObjectStore {
        s3_client: aws_sdk_s3::Client::new(&aws_config),
    };

    handle_validation_payload(event.payload, &config, &store)
        .map_err(|error| Error::from(error.message))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_runtime::run(service_fn(handle_request)).await
}
