use strafe_kinematics::*;

fn main() {
    let half_track = 0.3;
    let module_locations = [
        Translation2d::new(half_track, half_track),
        Translation2d::new(half_track, -half_track),
        Translation2d::new(-half_track, half_track),
        Translation2d::new(-half_track, -half_track),
    ];
    let kinematics_result = SwerveDriveKinematics::new(&module_locations);

    let chassis_speeds = ChassisSpeeds::new(1.0, 0.25, 0.0); // 1.0 m/s forward, drifting left
    let max_module_speed = 0.9;
    let dt = 0.1; // Time step in seconds
    let num_steps = 10;

    match kinematics_result {
        Ok(kinematics) => {
            println!("Initializing simulation...");
            println!("  Swerve Drive Parameters:");
            for (i, location) in kinematics.module_locations().iter().enumerate() {
                println!("    Module {}:     {}", i, location);
            }
            println!("  Simulation Settings:");
            println!("    Chassis Speeds: {}", chassis_speeds);
            println!("    Max Module Speed: {} m/s", max_module_speed);
            println!("    Time Step:    {} s", dt);
            println!("    Num Steps:    {}", num_steps);

            let mut commanded = vec![SwerveModuleState::default(); kinematics.module_count()];
            let mut positions = vec![SwerveModulePosition::default(); kinematics.module_count()];
            let mut odometry =
                match SwerveDriveOdometry::new(kinematics.clone(), Rotation2d::IDENTITY, &positions) {
                    Ok(odometry) => odometry,
                    Err(e) => {
                        eprintln!("Failed to initialize odometry: {}", e);
                        return;
                    }
                };

            println!("\nSimulating...");

            for i in 0..num_steps {
                commanded = match kinematics.to_module_states(&chassis_speeds, &commanded) {
                    Ok(states) => states,
                    Err(e) => {
                        eprintln!("Error during simulation step {}: {}", i + 1, e);
                        break;
                    }
                };
                desaturate_wheel_speeds(&mut commanded, max_module_speed);

                for (position, state) in positions.iter_mut().zip(&commanded) {
                    position.distance += state.speed * dt;
                    position.angle = state.angle;
                }

                match odometry.update(Rotation2d::IDENTITY, &positions) {
                    Ok(pose) => println!("Step {:>2}: Pose: {}", i + 1, pose),
                    Err(e) => {
                        eprintln!("Error during simulation step {}: {}", i + 1, e);
                        break; // Stop loop on error
                    }
                }
            }

            println!("\nSimulation complete.");
            println!("Final Pose: {:?}", odometry.pose());
        }
        Err(e) => {
            eprintln!("Failed to initialize kinematics: {}", e);
            eprintln!("Please provide at least two distinct module locations.");
        }
    }
}
