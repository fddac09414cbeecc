//! Demo dataset for `--seed-demo` on the in-memory backend.

use taskscope_core::domain::{ChainRecord, GroupRecord, JobId, JobRecord, JobStatus};
use taskscope_core::impls::InMemoryBackend;

pub async fn seed(backend: &InMemoryBackend, queue: &str) {
    for task in ["add", "send_email", "resize_image"] {
        backend.register_task(task).await;
    }

    let done = [("demo-1", "add"), ("demo-2", "send_email"), ("demo-3", "add")];
    for (id, task) in done {
        backend
            .insert_job(
                JobRecord::new(id, task, queue)
                    .with_payload(format!("{{\"job\":\"{id}\"}}"))
                    .with_status(JobStatus::Success),
            )
            .await;
        backend.set_result(id, format!("{{\"ok\":\"{id}\"}}")).await;
    }

    let mut failed = JobRecord::new("demo-4", "resize_image", queue).with_status(JobStatus::Failed);
    failed.prev_error = Some("image too large".to_string());
    failed.max_retry = 3;
    failed.retried = 3;
    backend.insert_job(failed).await;

    for i in 5..17 {
        backend
            .insert_job(JobRecord::new(format!("demo-{i}"), "add", queue))
            .await;
    }

    backend
        .insert_chain(ChainRecord::new(
            "demo-chain",
            vec![JobId::new("demo-1"), JobId::new("demo-2")],
            "demo-3",
        ))
        .await;
    backend
        .insert_group(
            GroupRecord::new("demo-group")
                .with_member("demo-1", JobStatus::Success)
                .with_member("demo-4", JobStatus::Failed),
        )
        .await;
}
