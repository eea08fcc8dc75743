//! Static unit files and script templates for the bootstrap node

pub const BOOTKUBE_SH: &str = r#"#!/usr/bin/env bash
set -e

mkdir --parents /etc/kubernetes/manifests/

if [ ! -d bootkube ]
then
	echo "Rendering Kubernetes core manifests..."
	podman run --rm --volume "$PWD:/assets:z" "{{ bootkube_image }}" \
		render \
		--asset-dir=/assets/bootkube \
		--api-servers=https://localhost:6443 \
		--etcd-servers={{ etcd_cluster }}
	cp --recursive bootkube/bootstrap-manifests/. /etc/kubernetes/manifests/
fi

echo "Starting bootkube..."
podman run --rm --network host \
	--volume /etc/kubernetes:/etc/kubernetes:z \
	--volume "$PWD:/assets:z" \
	"{{ bootkube_image }}" start --asset-dir=/assets/bootkube
"#;

pub const BOOTKUBE_SERVICE: &str = r"[Unit]
Description=Bootstrap a Kubernetes cluster
Wants=kubelet.service
After=kubelet.service

[Service]
WorkingDirectory=/opt/tectonic
ExecStart=/opt/tectonic/bootkube.sh
Restart=on-failure
RestartSec=5s
";

pub const KUBELET_SERVICE: &str = r"[Unit]
Description=Kubernetes Kubelet
Wants=rpc-statd.service

[Service]
Environment=KUBELET_IMAGE={{ kubelet_image }}
ExecStartPre=/bin/mkdir --parents /etc/kubernetes/manifests
ExecStart=/usr/bin/hyperkube kubelet \
  --bootstrap-kubeconfig=/etc/kubernetes/kubeconfig \
  --kubeconfig=/var/lib/kubelet/kubeconfig \
  --cluster-dns={{ cluster_dns_ip }} \
  --cluster-domain=cluster.local \
  --cloud-provider={{ cloud_provider }} \
  --pod-manifest-path=/etc/kubernetes/manifests
Restart=always
RestartSec=10

[Install]
WantedBy=multi-user.target
";
