use lab_core::model::{ExperimentId, ProgressUpdate, UserId};
use lab_core::steps;
use lab_core::time::fixed_now;
use services::{AppServices, Clock, ProgressClient};
use storage::catalog::ExperimentCatalog;

#[tokio::test]
async fn local_client_round_trips_through_services() {
    let services = AppServices::in_memory(Clock::fixed(fixed_now()), ExperimentCatalog::bundled().unwrap());
    let client = services.local_client();

    let experiment = services
        .catalog()
        .get_experiment(ExperimentId::new(2).unwrap())
        .unwrap();
    let user = UserId::new("browser-42").unwrap();

    assert!(client.fetch_progress(&user, experiment.id).await.unwrap().is_none());

    let total = experiment.total_steps();
    let current = steps::saved_from_index(2, total);
    let saved = client
        .save_progress(
            ProgressUpdate::new(user.clone(), experiment.id)
                .with_current_step(current)
                .with_completed(false)
                .with_percentage(steps::percentage(current, total, false)),
        )
        .await
        .unwrap();
    assert_eq!(saved.current_step, 3);
    assert_eq!(saved.progress_percentage, 60);

    let listed = services.progress().list_progress(&user).await.unwrap();
    assert_eq!(listed, vec![saved]);
}

#[tokio::test]
async fn services_share_one_progress_table() {
    let services = AppServices::in_memory(Clock::default_clock(), ExperimentCatalog::bundled().unwrap());
    let writer = services.local_client();
    let reader = services.clone().local_client();
    let user = UserId::new("shared").unwrap();
    let exp = ExperimentId::new(1).unwrap();

    writer
        .save_progress(ProgressUpdate::new(user.clone(), exp).with_current_step(2))
        .await
        .unwrap();

    let record = reader.fetch_progress(&user, exp).await.unwrap().unwrap();
    assert_eq!(record.current_step, 2);
}
