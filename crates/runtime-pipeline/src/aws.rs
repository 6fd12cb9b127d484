use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region, SdkConfig};

/// Shared SDK configuration; an explicit region wins over the default chain.
pub async fn load_sdk_config(region: Option<String>) -> SdkConfig {
    let region_provider = RegionProviderChain::first_try(region.map(Region::new))
        .or_default_provider()
        .or_else("us-east-1");
    aws_config::defaults(BehaviorVersion::latest())
        .region(region_provider)
        .load()
        .await
}
