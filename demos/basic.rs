//! Basic example demonstrating lloyd-kmeans usage
//!
//! Run with: cargo run --example basic --release

use lloyd_kmeans::{KMeans, KMeansConfig, SquaredEuclidean};
use ndarray::{array, Array2};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Verbose run summaries go through `log`; forward them to stderr
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lloyd_kmeans=info".parse()?),
        )
        .init();

    println!("=== lloyd-kmeans example ===\n");

    // Generate synthetic data: 3 clusters in 2D for easy visualization
    let n_samples = 300;
    let n_features = 2;
    let n_clusters = 3;

    println!("Generating {} samples with {} features...", n_samples, n_features);

    let mut data = Array2::<f32>::zeros((n_samples, n_features));

    // Cluster centers
    let centers = [[-5.0f32, -5.0], [0.0, 5.0], [5.0, -5.0]];

    for i in 0..n_samples {
        let cluster_idx = i % 3;
        let noise = Array2::random((1, n_features), Uniform::new(-1.0f32, 1.0));
        data[[i, 0]] = centers[cluster_idx][0] + noise[[0, 0]];
        data[[i, 1]] = centers[cluster_idx][1] + noise[[0, 1]];
    }

    println!("True cluster centers:");
    for (i, center) in centers.iter().enumerate() {
        println!("  Cluster {}: ({:.2}, {:.2})", i, center[0], center[1]);
    }
    println!();

    // Initial guesses are the caller's business; start from rough corners
    let mut centroids = array![[-1.0f32, -1.0], [0.0, 1.0], [1.0, -1.0]];

    let config = KMeansConfig::new(100).with_verbose(true);
    println!("Running k-means with k={}...\n", n_clusters);

    let kmeans = KMeans::with_config(config, SquaredEuclidean);
    let outcome = kmeans.fit_array(&data.view(), &mut centroids)?;

    println!(
        "Converged: {} after {} iterations",
        outcome.converged, outcome.iterations
    );

    println!("\nLearned centroids:");
    for i in 0..centroids.nrows() {
        println!(
            "  Centroid {}: ({:.4}, {:.4})",
            i,
            centroids[[i, 0]],
            centroids[[i, 1]]
        );
    }
    println!();

    println!("Cluster distribution:");
    for (i, count) in outcome.cluster_sizes(n_clusters).iter().enumerate() {
        println!(
            "  Cluster {}: {} samples ({:.1}%)",
            i,
            count,
            (*count as f64 / n_samples as f64) * 100.0
        );
    }
    println!();

    println!("First 10 sample assignments:");
    for i in 0..10 {
        println!(
            "  Sample {} at ({:.2}, {:.2}) -> Cluster {}",
            i,
            data[[i, 0]],
            data[[i, 1]],
            outcome.assignments[i]
        );
    }

    println!("\n=== Done! ===");

    Ok(())
}
