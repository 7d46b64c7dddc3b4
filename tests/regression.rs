use approx::assert_abs_diff_eq;
use linfit::{
    cost, solve_iterations, solve_threshold, CostHistory, CostThreshold, Error, FixedIterations,
    GradientDescent, Progress, Silent, StoppingRule, Tensor,
};

fn two_points() -> (Tensor<f64>, Tensor<f64>) {
    (Tensor::column(vec![2.0, 3.0]), Tensor::column(vec![4.0, 6.0]))
}

fn three_points() -> (Tensor<f64>, Tensor<f64>) {
    (
        Tensor::column(vec![1.0, 2.0, 3.0]),
        Tensor::column(vec![2.0, 4.0, 6.0]),
    )
}

#[test]
fn test_iterations_fit_line() {
    let (x, y) = two_points();
    let model = solve_iterations(&x, &y, 0.01, 20_000).unwrap();

    assert_abs_diff_eq!(0.0, model.bias(), epsilon = 0.05);
    assert_abs_diff_eq!(2.0, model.weights()[0], epsilon = 0.05);
    assert_abs_diff_eq!(7.0, model.predict(&[3.5]).unwrap(), epsilon = 0.1);
}

#[test]
fn test_threshold_fit_line() {
    let (x, y) = two_points();
    let model = solve_threshold(&x, &y, 0.01, 1e-9).unwrap();
    assert_abs_diff_eq!(7.0, model.predict(&[3.5]).unwrap(), epsilon = 0.1);

    let (x, y) = three_points();
    let model = solve_threshold(&x, &y, 0.01, 1e-9).unwrap();
    assert_abs_diff_eq!(8.0, model.predict(&[4.0]).unwrap(), epsilon = 0.1);
}

#[test]
fn test_accepts_target_vector() {
    let (x, _) = three_points();
    let y = Tensor::vector(vec![2.0, 4.0, 6.0]);

    let model = solve_threshold(&x, &y, 0.01, 1e-9).unwrap();
    assert_abs_diff_eq!(8.0, model.predict(&[4.0]).unwrap(), epsilon = 0.1);
}

#[test]
fn test_cost_non_negative() {
    for seed in 0..16 {
        let x = Tensor::randn(vec![8, 3], seed);
        let theta = Tensor::randn(vec![3, 1], seed + 100);
        let y = Tensor::randn(vec![8, 1], seed + 200);

        assert!(cost(&theta, &x, &y).unwrap() >= 0.0);
    }
}

#[test]
fn test_cost_zero_iff_exact() {
    let x = Tensor::from_rows(&[vec![1.0, 2.0, -1.0], vec![1.0, 0.5, 3.0], vec![1.0, -4.0, 2.0]])
        .unwrap();
    let theta = Tensor::column(vec![0.5, 2.0, -1.0]);
    let y = x.matmul(&theta).unwrap();

    assert_eq!(0.0, cost(&theta, &x, &y).unwrap());

    let mut targets = y.to_vec();
    targets[1] += 0.25;
    assert!(cost(&theta, &x, &Tensor::column(targets)).unwrap() > 0.0);
}

#[test]
fn test_cost_non_increasing() {
    let (x, y) = two_points();
    let mut history = CostHistory::new();

    GradientDescent::new(0.01)
        .fit(&x, &y, FixedIterations::new(2_000), &mut history)
        .unwrap();

    assert_eq!(2_001, history.costs().len());
    assert!(history.is_non_increasing());
    assert!(history.costs()[2_000] < history.costs()[0]);
}

#[test]
fn test_predict_idempotent() {
    let (x, y) = three_points();
    let model = solve_iterations(&x, &y, 0.01, 1_000).unwrap();
    let parameters = model.parameters().to_vec();

    let first = model.predict(&[4.0]).unwrap();
    let second = model.predict(&[4.0]).unwrap();

    assert_eq!(first, second);
    assert_eq!(parameters.as_slice(), model.parameters());
}

#[test]
fn test_zero_iterations() {
    let (x, y) = two_points();
    let model = solve_iterations(&x, &y, 0.01, 0).unwrap();

    assert_eq!(&[0.0, 0.0], model.parameters());
    assert_eq!(0.0, model.predict(&[3.5]).unwrap());
}

#[test]
fn test_threshold_runs_at_least_once() {
    let (x, y) = two_points();
    let fit = GradientDescent::new(0.01)
        .fit(&x, &y, CostThreshold::new(1e12), &mut Silent)
        .unwrap();

    assert_eq!(1, fit.iterations());
    assert!(fit.model().parameters().iter().any(|&p| p != 0.0));
}

#[test]
fn test_threshold_stops_on_divergence() {
    let (x, y) = two_points();
    let fit = GradientDescent::new(1.0)
        .fit(&x, &y, CostThreshold::new(1e-9), &mut Silent)
        .unwrap();

    assert_eq!(1, fit.iterations());
    assert_eq!(543.25, fit.cost());

    let res = GradientDescent::new(1.0)
        .with_divergence_check(0.0)
        .fit(&x, &y, CostThreshold::new(1e-9), &mut Silent);
    assert!(matches!(res, Err(Error::Diverged { iteration: 1, .. })));
}

#[test]
fn test_capped_threshold() {
    let (x, y) = two_points();
    let fit = GradientDescent::new(0.01)
        .fit(&x, &y, CostThreshold::new(0.0).capped(50), &mut Silent)
        .unwrap();

    assert_eq!(50, fit.iterations());
}

#[test]
fn test_custom_rule_and_observer() {
    let (x, y) = three_points();
    let mut seen = Vec::new();
    let mut observer = |progress: &Progress, parameters: &[f64]| {
        assert_eq!(2, parameters.len());
        seen.push(progress.iterations);
    };

    let fit = GradientDescent::new(0.01)
        .fit(
            &x,
            &y,
            |progress: &Progress| progress.cost > 1.0,
            &mut observer,
        )
        .unwrap();

    assert!(fit.cost() <= 1.0);
    assert_eq!((1..=fit.iterations()).collect::<Vec<_>>(), seen);
}

#[test]
fn test_fixed_iterations_count() {
    let (x, y) = three_points();
    let fit = GradientDescent::new(0.01)
        .fit(&x, &y, FixedIterations::new(37), &mut Silent)
        .unwrap();

    assert_eq!(37, fit.iterations());
    assert_abs_diff_eq!(
        fit.cost(),
        fit.model().cost(&x, &y).unwrap(),
        epsilon = 1e-12
    );
}

#[test]
fn test_multivariate_recovery() {
    let n = 128;
    let d = 3;
    let x = Tensor::randn(vec![n, d], 0);
    let theta_true = Tensor::randn(vec![d, 1], 1);
    let bias = 0.75;
    let y = x
        .matmul(&theta_true)
        .unwrap()
        .apply_uop(|target| target + bias);

    let model = solve_iterations(&x, &y, 0.1, 5_000).unwrap();

    assert_abs_diff_eq!(bias, model.bias(), epsilon = 1e-6);
    for (expected, fitted) in theta_true.data().iter().zip(model.weights()) {
        assert_abs_diff_eq!(*expected, *fitted, epsilon = 1e-6);
    }

    let row = x.to_vec()[..d].to_vec();
    assert_abs_diff_eq!(y.data()[0], model.predict(&row).unwrap(), epsilon = 1e-5);
}

#[test]
fn test_dimension_mismatch() {
    let x = Tensor::column(vec![1.0, 2.0, 3.0]);
    let y = Tensor::column(vec![2.0, 4.0]);

    assert!(matches!(
        solve_iterations(&x, &y, 0.01, 10),
        Err(Error::DimensionMismatch { op: "fit", .. })
    ));
    assert!(matches!(
        solve_threshold(&x, &Tensor::zeros(vec![3, 2]), 0.01, 1e-9),
        Err(Error::DimensionMismatch { op: "into_column", .. })
    ));

    let (x, y) = three_points();
    let model = solve_iterations(&x, &y, 0.01, 10).unwrap();
    assert!(matches!(
        model.predict(&[1.0, 2.0]),
        Err(Error::DimensionMismatch { op: "predict", .. })
    ));
}

#[test]
fn test_empty_dataset() {
    let x = Tensor::zeros(vec![0, 2]);
    let y = Tensor::zeros(vec![0, 1]);

    assert!(matches!(
        solve_threshold(&x, &y, 0.01, 1e-9),
        Err(Error::EmptyDataset)
    ));
}
