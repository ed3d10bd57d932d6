//! Prints the CRD manifests for all resource kinds as a multi-document YAML
//! stream, suitable for `kubectl apply -f -`.

use anyhow::Result;
use aws_resource_controller::crd::{ProviderConfig, Role, Secret, UserPolicyAttachment};
use kube::CustomResourceExt;

fn main() -> Result<()> {
    let crds = [
        ProviderConfig::crd(),
        Role::crd(),
        UserPolicyAttachment::crd(),
        Secret::crd(),
    ];
    for crd in &crds {
        println!("---");
        print!("{}", serde_yaml::to_string(crd)?);
    }
    Ok(())
}
