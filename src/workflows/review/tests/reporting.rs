use super::common::{pedagogical, technical, work};
use crate::workflows::review::domain::{
    Assignment, Evaluation, EvaluationId, EvaluationMethod, EvaluatorId, WorkId,
};
use crate::workflows::review::reporting::{
    evaluation_progress, evaluation_statistics, works_podium,
};

fn link(work_id: &str, evaluator_id: &str) -> Assignment {
    Assignment {
        work_id: WorkId(work_id.to_string()),
        evaluator_id: EvaluatorId(evaluator_id.to_string()),
    }
}

fn evaluation(
    id: &str,
    evaluator_id: &str,
    work_id: &str,
    criteria: [u8; 5],
    method: EvaluationMethod,
) -> Evaluation {
    Evaluation {
        id: EvaluationId(id.to_string()),
        criteria,
        method,
        evaluator_id: EvaluatorId(evaluator_id.to_string()),
        work_id: WorkId(work_id.to_string()),
    }
}

#[test]
fn one_of_three_completed_reports_33_3_percent() {
    let works = vec![work("w1", "Chatbot escolar", "Carlos", "Computação", "IA")];
    let evaluators = vec![
        pedagogical("p1", "Paula Freire"),
        technical("t1", "Alan Turing", "Computação", &[]),
        technical("t2", "Grace Hopper", "Computação", &[]),
    ];
    let assignments = vec![link("w1", "p1"), link("w1", "t1"), link("w1", "t2")];
    let evaluations = vec![evaluation(
        "e1",
        "t1",
        "w1",
        [5, 5, 5, 5, 5],
        EvaluationMethod::Online,
    )];

    let report = evaluation_progress(&works, &evaluators, &assignments, &evaluations, 1, 20);

    assert_eq!(report.works_progress.len(), 1);
    let progress = &report.works_progress[0];
    assert_eq!(progress.total_evaluators, 3);
    assert_eq!(progress.completed_evaluations, 1);
    assert_eq!(progress.pending_evaluations, 2);
    assert_eq!(progress.progress_percentage, 33.3);

    let pending: Vec<&str> = progress
        .pending_evaluators
        .iter()
        .map(|evaluator| evaluator.id.0.as_str())
        .collect();
    assert_eq!(pending, vec!["p1", "t2"]);

    assert_eq!(report.overall_stats.total_expected_evaluations, 3);
    assert_eq!(report.overall_stats.overall_progress, 33.3);
}

#[test]
fn a_work_without_assignments_reports_zero_progress() {
    let works = vec![work("w1", "Chatbot escolar", "Carlos", "Computação", "IA")];
    let report = evaluation_progress(&works, &[], &[], &[], 1, 20);

    assert_eq!(report.works_progress[0].progress_percentage, 0.0);
    assert_eq!(report.overall_stats.overall_progress, 0.0);
}

#[test]
fn pagination_slices_works_but_not_the_overall_totals() {
    let works = vec![
        work("w1", "Primeiro", "A", "Computação", "IA"),
        work("w2", "Segundo", "B", "Computação", "IA"),
        work("w3", "Terceiro", "C", "Computação", "IA"),
    ];
    let evaluators = vec![technical("t1", "Alan Turing", "Computação", &[])];
    let assignments = vec![link("w1", "t1"), link("w2", "t1"), link("w3", "t1")];
    let evaluations = vec![evaluation(
        "e1",
        "t1",
        "w1",
        [5, 5, 5, 5, 5],
        EvaluationMethod::Online,
    )];

    let report = evaluation_progress(&works, &evaluators, &assignments, &evaluations, 2, 1);

    assert_eq!(report.works_progress.len(), 1);
    assert_eq!(report.works_progress[0].title, "Segundo");

    assert_eq!(report.overall_stats.total_works, 3);
    assert_eq!(report.overall_stats.total_expected_evaluations, 3);
    assert_eq!(report.overall_stats.overall_progress, 33.3);

    assert_eq!(report.pagination.page, 2);
    assert_eq!(report.pagination.pages, 3);
    assert_eq!(report.pagination.total, 3);
    assert!(report.pagination.has_prev);
    assert!(report.pagination.has_next);
    assert_eq!(report.pagination.prev_num, Some(1));
    assert_eq!(report.pagination.next_num, Some(3));
}

#[test]
fn a_page_past_the_end_is_empty_but_keeps_totals() {
    let works = vec![work("w1", "Primeiro", "A", "Computação", "IA")];
    let report = evaluation_progress(&works, &[], &[], &[], 5, 20);

    assert!(report.works_progress.is_empty());
    assert_eq!(report.overall_stats.total_works, 1);
    assert!(!report.pagination.has_next);
}

#[test]
fn podium_ranks_ties_by_input_order() {
    let works = vec![
        work("w1", "Primeiro", "A", "Computação", "IA"),
        work("w2", "Segundo", "B", "Computação", "IA"),
        work("w3", "Terceiro", "C", "Computação", "IA"),
        work("w4", "Quarto", "D", "Computação", "IA"),
    ];
    // Averages 4.8, 3.2, 4.8, 2.0: the tied pair keeps input order.
    let evaluations = vec![
        evaluation("e1", "t1", "w1", [5, 5, 5, 5, 4], EvaluationMethod::Online),
        evaluation("e2", "t1", "w2", [4, 3, 3, 3, 3], EvaluationMethod::Online),
        evaluation("e3", "t1", "w3", [5, 5, 5, 5, 4], EvaluationMethod::Online),
        evaluation("e4", "t1", "w4", [2, 2, 2, 2, 2], EvaluationMethod::Online),
    ];

    let podium = works_podium(&works, &evaluations);
    let area = podium.get("Computação").expect("area present");

    assert_eq!(area.total_works, 4);
    assert_eq!(area.evaluated_works, 4);

    let ranked: Vec<(&str, f64)> = area
        .podium
        .iter()
        .map(|place| (place.work_id.0.as_str(), place.average_score))
        .collect();
    assert_eq!(ranked, vec![("w1", 4.8), ("w3", 4.8), ("w2", 3.2)]);
}

#[test]
fn podium_averages_across_all_of_a_works_evaluations() {
    let works = vec![work("w1", "Primeiro", "A", "Computação", "IA")];
    let evaluations = vec![
        evaluation("e1", "t1", "w1", [5, 5, 5, 5, 4], EvaluationMethod::Online),
        evaluation(
            "e2",
            "t2",
            "w1",
            [4, 3, 3, 3, 3],
            EvaluationMethod::ManualValidated,
        ),
    ];

    let podium = works_podium(&works, &evaluations);
    let area = podium.get("Computação").expect("area present");

    // (24 + 16) / (2 evaluations * 5 criteria)
    assert_eq!(area.podium[0].average_score, 4.0);
    assert_eq!(area.podium[0].total_score, 40);
    assert_eq!(area.podium[0].evaluations_count, 2);
}

#[test]
fn unevaluated_works_are_counted_but_never_ranked() {
    let works = vec![
        work("w1", "Primeiro", "A", "Biologia", "Genética"),
        work("w2", "Segundo", "B", "Biologia", "Ecologia"),
    ];
    let evaluations = vec![evaluation(
        "e1",
        "t1",
        "w1",
        [4, 4, 4, 4, 4],
        EvaluationMethod::Online,
    )];

    let podium = works_podium(&works, &evaluations);
    let area = podium.get("Biologia").expect("area present");

    assert_eq!(area.total_works, 2);
    assert_eq!(area.evaluated_works, 1);
    assert_eq!(area.podium.len(), 1);
    assert_eq!(area.podium[0].work_id.0, "w1");
}

#[test]
fn statistics_count_methods_and_active_evaluators() {
    let works = vec![
        work("w1", "Primeiro", "A", "Computação", "IA"),
        work("w2", "Segundo", "B", "Computação", "IA"),
    ];
    let evaluators = vec![
        pedagogical("p1", "Paula Freire"),
        technical("t1", "Alan Turing", "Computação", &[]),
        technical("t2", "Grace Hopper", "Computação", &[]),
        technical("t3", "Julia Castro", "Computação", &[]),
    ];
    let evaluations = vec![
        evaluation("e1", "t1", "w1", [5, 5, 5, 5, 5], EvaluationMethod::Online),
        evaluation("e2", "t1", "w2", [4, 4, 4, 4, 4], EvaluationMethod::Online),
        evaluation(
            "e3",
            "t2",
            "w1",
            [3, 3, 3, 3, 3],
            EvaluationMethod::AiProcessed,
        ),
    ];

    let statistics = evaluation_statistics(&works, &evaluators, &evaluations);

    assert_eq!(statistics.total_evaluations, 3);
    assert_eq!(statistics.total_works, 2);
    assert_eq!(statistics.total_evaluators, 4);
    assert_eq!(statistics.active_evaluators, 2);
    assert_eq!(statistics.online_evaluations, 2);
    assert_eq!(statistics.manual_validated_evaluations, 0);
    assert_eq!(statistics.ai_processed_evaluations, 1);
    assert_eq!(statistics.completion_rate, 50.0);
}
