use argparse::{ArgumentParser, Collect, Store, StoreOption, StoreTrue};
use linfit::{
    CostThreshold, Dataset, FixedIterations, GradientDescent, LogObserver, Tensor,
};
use simplelog::{Config, LevelFilter, SimpleLogger};

struct Options {
    csv_path: Option<String>,
    alpha: f64,
    iterations: usize,
    threshold: Option<f64>,
    predict: Vec<f64>,
    verbose: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            csv_path: None,
            alpha: 0.5,
            iterations: 1000,
            threshold: None,
            predict: Vec::new(),
            verbose: false,
        }
    }
}

fn parse_options() -> Options {
    let mut options = Options::default();
    {
        let mut ap = ArgumentParser::new();
        ap.set_description("Fit a linear model by batch gradient descent.");
        ap.refer(&mut options.csv_path)
            .add_option(&["--csv"], StoreOption, "CSV file with a header row, target in the last column");
        ap.refer(&mut options.alpha)
            .add_option(&["-a", "--alpha"], Store, "learning rate");
        ap.refer(&mut options.iterations)
            .add_option(&["-n", "--iterations"], Store, "number of updates");
        ap.refer(&mut options.threshold)
            .add_option(&["-t", "--threshold"], StoreOption, "stop once an update lowers the cost by at most this much");
        ap.refer(&mut options.verbose)
            .add_option(&["-v", "--verbose"], StoreTrue, "log fitting progress");
        ap.refer(&mut options.predict)
            .add_argument("features", Collect, "feature row to predict");
        ap.parse_args_or_exit();
    }
    options
}

/// Targets are an exact linear function of normally distributed features.
fn synthetic() -> linfit::Result<Dataset> {
    let n = 128;
    let d = 10;
    let input = Tensor::randn(vec![n, d], 0);
    let theta_true = Tensor::randn(vec![d, 1], 1);
    let targ = input.matmul(&theta_true)?;
    Dataset::new(input, targ)
}

fn run(options: &Options) -> linfit::Result<()> {
    let dataset = match options.csv_path {
        Some(ref path) => Dataset::from_csv_path(path)?,
        None => synthetic()?,
    };
    log::info!(
        "fitting {} samples with {} features",
        dataset.n_samples(),
        dataset.n_features()
    );

    let solver = GradientDescent::new(options.alpha);
    let mut observer = LogObserver::every(options.iterations / 10);
    let fit = match options.threshold {
        Some(threshold) => solver.fit(dataset.x(), dataset.y(), CostThreshold::new(threshold), &mut observer)?,
        None => solver.fit(dataset.x(), dataset.y(), FixedIterations::new(options.iterations), &mut observer)?,
    };

    println!("iterations: {}", fit.iterations());
    println!("final cost: {}", fit.cost());
    println!("parameters: {:?}", fit.model().parameters());

    if !options.predict.is_empty() {
        println!("prediction: {}", fit.model().predict(&options.predict)?);
    }
    Ok(())
}

fn main() {
    let options = parse_options();
    let level = if options.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(err) = SimpleLogger::init(level, Config::default()) {
        eprintln!("logger already initialized: {}", err);
    }

    if let Err(err) = run(&options) {
        log::error!("{}", err);
        std::process::exit(1);
    }
}
