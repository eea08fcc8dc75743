//! Bootstrap script and unit templates, rendered with minijinja

use minijinja::{Environment, UndefinedBehavior};
use serde::Serialize;

use crate::error::{AssetError, AssetResult};

/// Values for the bootstrap templates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TemplateData {
    pub cluster_dns_ip: String,
    pub cloud_provider: String,
    pub etcd_cluster: String,
    pub kubelet_image: String,
    pub bootkube_image: String,
}

fn environment() -> Environment<'static> {
    let mut env = Environment::new();
    env.set_undefined_behavior(UndefinedBehavior::Strict);
    env.set_keep_trailing_newline(true);
    env
}

/// Render `template` against `data`.
///
/// Referencing a variable `TemplateData` does not carry, or malformed
/// template syntax, is an error naming `template_name`.
pub fn render(template_name: &str, template: &str, data: &TemplateData) -> AssetResult<String> {
    environment()
        .render_named_str(template_name, template, data)
        .map_err(|source| AssetError::Template {
            name: template_name.to_string(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ignition::content::{BOOTKUBE_SH, KUBELET_SERVICE};
    use minijinja::ErrorKind;

    fn data() -> TemplateData {
        TemplateData {
            cluster_dns_ip: "10.3.0.10".to_string(),
            cloud_provider: "aws".to_string(),
            etcd_cluster: "https://a:2379,https://b:2379".to_string(),
            kubelet_image: "openshift/origin-node:latest".to_string(),
            bootkube_image: "quay.io/coreos/bootkube:v0.10.0".to_string(),
        }
    }

    fn kind(err: &AssetError) -> ErrorKind {
        match err {
            AssetError::Template { source, .. } => source.kind(),
            other => panic!("expected a template error, got {other:?}"),
        }
    }

    #[test]
    fn substitutes_fields() {
        let out = render("t", "dns={{cluster_dns_ip}} etcd={{ etcd_cluster }}", &data()).unwrap();
        assert_eq!(out, "dns=10.3.0.10 etcd=https://a:2379,https://b:2379");
    }

    #[test]
    fn text_without_fields_is_unchanged() {
        assert_eq!(render("t", "plain { text }\n", &data()).unwrap(), "plain { text }\n");
    }

    #[test]
    fn unknown_field_is_error() {
        let err = render("t", "{{ nope }}", &data()).unwrap_err();
        assert_eq!(kind(&err), ErrorKind::UndefinedError);
        assert_eq!(err.to_string(), "failed to render template t");
    }

    #[test]
    fn unclosed_braces_are_error() {
        let err = render("t", "x {{ cluster_dns_ip", &data()).unwrap_err();
        assert_eq!(kind(&err), ErrorKind::SyntaxError);
    }

    #[test]
    fn bootkube_script_keeps_shell_syntax() {
        let out = render("bootkube.sh", BOOTKUBE_SH, &data()).unwrap();
        assert!(out.contains("--volume \"$PWD:/assets:z\" \"quay.io/coreos/bootkube:v0.10.0\""));
        assert!(out.contains("--etcd-servers=https://a:2379,https://b:2379\n"));
        assert!(out.ends_with("start --asset-dir=/assets/bootkube\n"));
    }

    #[test]
    fn kubelet_unit() {
        let out = render("kubelet.service", KUBELET_SERVICE, &data()).unwrap();
        insta::assert_snapshot!(out, @r"
        [Unit]
        Description=Kubernetes Kubelet
        Wants=rpc-statd.service

        [Service]
        Environment=KUBELET_IMAGE=openshift/origin-node:latest
        ExecStartPre=/bin/mkdir --parents /etc/kubernetes/manifests
        ExecStart=/usr/bin/hyperkube kubelet \
          --bootstrap-kubeconfig=/etc/kubernetes/kubeconfig \
          --kubeconfig=/var/lib/kubelet/kubeconfig \
          --cluster-dns=10.3.0.10 \
          --cluster-domain=cluster.local \
          --cloud-provider=aws \
          --pod-manifest-path=/etc/kubernetes/manifests
        Restart=always
        RestartSec=10

        [Install]
        WantedBy=multi-user.target
        ");
    }
}
